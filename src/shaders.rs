//! Built-in shader pair for the undewarp quad.
//!
//! The vertex stage applies the four projection uniforms in order:
//! cartesian correction (quad coords -> consistent Cartesian frame), model,
//! look-at view, perspective. The Y sign flip on the position matches the
//! un-flipped texture upload, so the frame's origin lines up with the
//! texture-coordinate origin.

pub const QUAD_VERTEX_SHADER: &str = r#"#version 330 core
in vec2 a_position;
in vec2 a_texcoord;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_perspective;
uniform mat4 u_cartesian;

out vec2 v_texcoord;

void main() {
    gl_Position = u_perspective * u_view * u_model * u_cartesian
        * vec4(a_position * vec2(1.0, -1.0), 0.0, 1.0);
    v_texcoord = a_texcoord;
}"#;

pub const QUAD_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_texcoord;

uniform sampler2D u_tex;

out vec4 frag_color;

void main() {
    vec4 texel = texture(u_tex, v_texcoord);
    frag_color = vec4(texel.rgb, texel.a);
}"#;
