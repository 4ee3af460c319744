use std::borrow::Cow;

use identicon::GpuError;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("identicon fullscreen triangle"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Wraps a WebGL fragment program and compiles it, surfacing validation
/// errors as [`GpuError::Compile`] instead of the device's error handler.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &str,
) -> Result<wgpu::ShaderModule, GpuError> {
    let wrapped = wrap_fragment(source);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("identicon fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(GpuError::Compile {
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

/// Turns a WebGL 1 fragment program into a GLSL 450 module.
///
/// 1. Drop `precision` statements and every `uniform` declaration line; the
///    uniforms come back as macros over [`HEADER`]'s block.
/// 2. Rename `gl_FragColor`/`gl_FragCoord` to private globals and the
///    program's `main` to `identicon_main`.
/// 3. Append [`FOOTER`], whose `main` flips `gl_FragCoord` to a bottom-left
///    origin, runs the program and writes `outColor`.
pub fn wrap_fragment(source: &str) -> String {
    let mut body = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("precision ") || trimmed.starts_with("uniform ") {
            continue;
        }
        body.push_str(line);
        body.push('\n');
    }
    let body = body
        .replace("gl_FragColor", "identicon_FragColor")
        .replace("gl_FragCoord", "identicon_FragCoord")
        .replacen("void main()", "void identicon_main()", 1);
    format!("{HEADER}\n#line 1\n{body}{FOOTER}")
}

/// Layout must match [`crate::uniforms::IdenticonUniforms`].
const HEADER: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform IdenticonParams {
    vec4 _P;
    vec4 _Q;
    vec3 _C1;
    float _S;
    vec3 _C2;
    float _H;
    vec2 _R;
    float _T;
    float _padding0;
} ubo;

#define P ubo._P
#define Q ubo._Q
#define C1 ubo._C1
#define S ubo._S
#define C2 ubo._C2
#define H ubo._H
#define R ubo._R
#define T ubo._T

vec4 identicon_FragCoord;
vec4 identicon_FragColor;
";

const FOOTER: &str = r"
void main() {
    identicon_FragCoord = vec4(gl_FragCoord.x, R.y - gl_FragCoord.y, gl_FragCoord.z, 1.0);
    identicon_FragColor = vec4(0.0);
    identicon_main();
    outColor = identicon_FragColor;
}
";

const VERTEX_SHADER_GLSL: &str = r"#version 450
const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    gl_Position = vec4(positions[vertex_index], 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> String {
        identicon::ShaderProgram::from_body(
            "uniform float T;\nvoid main(){\n  gl_FragColor=vec4(UV,T,1.);}",
            true,
        )
        .fragment_source
    }

    #[test]
    fn every_catalog_shader_validates_once_wrapped() {
        let mut failures = Vec::new();
        let mut checked = 0;
        for generator in identicon::registry().shaders() {
            let Some(program) = generator.as_shader() else {
                continue;
            };
            checked += 1;
            let wrapped = wrap_fragment(&program.fragment_source);
            let options = naga::front::glsl::Options::from(naga::ShaderStage::Fragment);
            let module = match naga::front::glsl::Frontend::default().parse(&options, &wrapped) {
                Ok(module) => module,
                Err(err) => {
                    failures.push(format!("{}: parse: {err:?}", generator.id()));
                    continue;
                }
            };
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            );
            if let Err(err) = validator.validate(&module) {
                failures.push(format!("{}: validate: {err:?}", generator.id()));
            }
        }
        assert_eq!(checked, 39);
        assert!(failures.is_empty(), "{}", failures.join("\n"));
    }

    #[test]
    fn wrap_strips_webgl_declarations() {
        let wrapped = wrap_fragment(&payload());
        assert!(!wrapped.contains("precision mediump"));
        assert!(!wrapped.contains("uniform vec2 R;"));
        assert!(!wrapped.contains("uniform float T;"));
        assert!(wrapped.starts_with("#version 450"));
    }

    #[test]
    fn wrap_renames_builtins_and_entry_point() {
        let wrapped = wrap_fragment(&payload());
        assert!(wrapped.contains("void identicon_main(){"));
        assert!(wrapped.contains("identicon_FragColor=vec4(UV,T,1.);"));
        assert!(wrapped.contains("#define UV (identicon_FragCoord.xy/R)"));
        assert_eq!(wrapped.matches("void main()").count(), 1);
        assert!(wrapped.trim_end().ends_with('}'));
    }

    #[test]
    fn wrap_keeps_preamble_helpers() {
        let wrapped = wrap_fragment(&payload());
        for helper in ["float h12(", "float fbm(", "vec3 hsl2rgb("] {
            assert!(wrapped.contains(helper), "{helper}");
        }
    }
}
