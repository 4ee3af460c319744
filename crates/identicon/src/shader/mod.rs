//! GPU generators expressed as WebGL 1 style fragment programs.
//!
//! Each payload is a `main` body written against [`PREAMBLE`], which declares
//! the uniform contract (`R`, `S`, `H`, `P`, `Q`, `C1`, `C2`) plus a handful of
//! hash, noise and distance helpers. Animated payloads declare `uniform float
//! T;` themselves. The text is handed to a [`crate::ShaderExecutor`] verbatim;
//! nothing in this crate parses it.

pub(crate) mod art;
pub(crate) mod effects;
pub(crate) mod scenes;

use crate::registry::Generator;

/// Helpers and uniform declarations shared by every shader payload.
pub const PREAMBLE: &str = r#"precision mediump float;
uniform vec2 R;uniform float S,H;uniform vec4 P,Q;uniform vec3 C1,C2;
#define UV (gl_FragCoord.xy/R)
#define FC gl_FragCoord.xy
float h12(vec2 p){vec3 q=fract(vec3(p.xyx)*.1031);q+=dot(q,q.yzx+33.33);return fract((q.x+q.y)*q.z);}
float h11(float p){p=fract(p*.1031);p*=p+33.33;p*=p+p;return fract(p);}
vec2 h22(vec2 p){vec3 q=fract(vec3(p.xyx)*vec3(.1031,.1030,.0973));q+=dot(q,q.yzx+33.33);return fract((q.xx+q.yz)*q.zy);}
mat2 rot(float a){float s=sin(a),c=cos(a);return mat2(c,-s,s,c);}
float sdCirc(vec2 p,float r){return length(p)-r;}
float sdBox(vec2 p,vec2 b){vec2 d=abs(p)-b;return length(max(d,0.))+min(max(d.x,d.y),0.);}
float sdHex(vec2 p,float r){const vec3 k=vec3(-.866025,.5,.57735);p=abs(p);p-=2.*min(dot(k.xy,p),0.)*k.xy;p-=vec2(clamp(p.x,-k.z*r,k.z*r),r);return length(p)*sign(p.y);}
float smin(float a,float b,float k){float h=max(k-abs(a-b),0.)/k;return min(a,b)-h*h*k*.25;}
vec3 hsl2rgb(vec3 c){vec3 r=clamp(abs(mod(c.x*6.+vec3(0,4,2),6.)-3.)-1.,0.,1.);return c.z+c.y*(r-.5)*(1.-abs(2.*c.z-1.));}
float vnoise(vec2 p){vec2 i=floor(p),f=fract(p),u=f*f*(3.-2.*f);return mix(mix(h12(i),h12(i+vec2(1,0)),u.x),mix(h12(i+vec2(0,1)),h12(i+vec2(1,1)),u.x),u.y);}
float fbm(vec2 p){float v=0.,a=.5;for(int i=0;i<5;i++){v+=a*vnoise(p);p*=2.;a*=.5;}return v;}
"#;

/// Catalog entry before the preamble is attached.
pub(crate) struct ShaderPayload {
    pub id: &'static str,
    pub animated: bool,
    pub body: &'static str,
}

/// A complete fragment program and whether it varies with `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub fragment_source: String,
    pub animated: bool,
}

impl ShaderProgram {
    /// Prefixes `body` with [`PREAMBLE`].
    pub fn from_body(body: &str, animated: bool) -> Self {
        let mut fragment_source = String::with_capacity(PREAMBLE.len() + body.len());
        fragment_source.push_str(PREAMBLE);
        fragment_source.push_str(body);
        Self {
            fragment_source,
            animated,
        }
    }
}

fn collect(payloads: &[ShaderPayload]) -> Vec<Generator> {
    payloads
        .iter()
        .map(|payload| Generator::shader(payload.id, payload.body, payload.animated))
        .collect()
}

pub(crate) fn scene_generators() -> Vec<Generator> {
    collect(scenes::PAYLOADS)
}

pub(crate) fn art_generators() -> Vec<Generator> {
    collect(art::PAYLOADS)
}

pub(crate) fn effect_generators() -> Vec<Generator> {
    collect(effects::PAYLOADS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> impl Iterator<Item = &'static ShaderPayload> {
        scenes::PAYLOADS
            .iter()
            .chain(art::PAYLOADS)
            .chain(effects::PAYLOADS)
    }

    #[test]
    fn animated_payloads_declare_time_uniform() {
        for payload in all() {
            assert_eq!(
                payload.body.contains("uniform float T;"),
                payload.animated,
                "{}",
                payload.id
            );
        }
    }

    #[test]
    fn every_payload_defines_main_and_writes_a_colour() {
        for payload in all() {
            assert!(payload.body.contains("void main()"), "{}", payload.id);
            assert!(payload.body.contains("gl_FragColor"), "{}", payload.id);
        }
    }

    #[test]
    fn preamble_declares_uniforms_on_one_line() {
        let line = PREAMBLE.lines().nth(1).unwrap();
        assert!(line.starts_with("uniform vec2 R;"));
        assert!(line.contains("uniform vec3 C1,C2;"));
    }

    #[test]
    fn program_source_starts_with_preamble() {
        let program = ShaderProgram::from_body("void main(){gl_FragColor=vec4(1.);}", false);
        assert!(program.fragment_source.starts_with("precision mediump float;"));
        assert!(program.fragment_source.ends_with("vec4(1.);}"));
    }

    #[test]
    fn catalog_sizes() {
        assert_eq!(scenes::PAYLOADS.len(), 10);
        assert_eq!(art::PAYLOADS.len(), 12);
        assert_eq!(effects::PAYLOADS.len(), 17);
        assert_eq!(all().filter(|p| p.animated).count(), 8);
    }
}
