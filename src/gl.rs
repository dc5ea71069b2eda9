//! GL resource manager + frame renderer.
//!
//! Owns every GPU object of one player instance: shader program, VAO, the
//! vertex/texcoord/index buffers, and the video texture. All objects are
//! created together at init and released together by [`GlRenderer::destroy`],
//! so a stop tears the GPU state down deterministically. GL mutates
//! process-global bound state, so everything here stays on the render thread.

use glow::HasContext;

use dewarp_engine::error::{EngineError, ShaderStage};
use dewarp_engine::geometry::{QuadGeometry, INDICES, TEXCOORDS};
use dewarp_engine::media::FrameRef;
use dewarp_engine::projection::ProjectionState;
use dewarp_engine::scheduler::FrameSink;

use crate::logi;

/// Attribute/uniform location table, resolved once at link time and immutable
/// afterwards. A shader missing any of these is a programmer error and fails
/// the init instead of silently corrupting frames later.
struct Locations {
    a_position: u32,
    a_texcoord: u32,
    u_perspective: glow::NativeUniformLocation,
    u_view: glow::NativeUniformLocation,
    u_model: glow::NativeUniformLocation,
    u_cartesian: glow::NativeUniformLocation,
    u_tex: glow::NativeUniformLocation,
}

impl Locations {
    fn resolve(gl: &glow::Context, program: glow::NativeProgram) -> Result<Self, EngineError> {
        let attrib = |name: &str| -> Result<u32, EngineError> {
            unsafe { gl.get_attrib_location(program, name) }.ok_or_else(|| EngineError::Shader {
                stage: ShaderStage::Link,
                log: format!("program is missing attribute '{name}'"),
            })
        };
        let uniform = |name: &str| -> Result<glow::NativeUniformLocation, EngineError> {
            unsafe { gl.get_uniform_location(program, name) }.ok_or_else(|| EngineError::Shader {
                stage: ShaderStage::Link,
                log: format!("program is missing uniform '{name}'"),
            })
        };
        Ok(Self {
            a_position: attrib("a_position")?,
            a_texcoord: attrib("a_texcoord")?,
            u_perspective: uniform("u_perspective")?,
            u_view: uniform("u_view")?,
            u_model: uniform("u_model")?,
            u_cartesian: uniform("u_cartesian")?,
            u_tex: uniform("u_tex")?,
        })
    }
}

fn compile_shader(
    gl: &glow::Context,
    kind: u32,
    stage: ShaderStage,
    src: &str,
) -> Result<glow::NativeShader, EngineError> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(|e| EngineError::Shader {
            stage,
            log: format!("create_shader failed: {e}"),
        })?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(EngineError::Shader { stage, log });
        }
        Ok(shader)
    }
}

/// Compile + link the program, carrying the driver's diagnostic text on
/// failure. A link failure is fatal to this player instance.
fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, EngineError> {
    let vs = compile_shader(gl, glow::VERTEX_SHADER, ShaderStage::Vertex, vert_src)?;
    let fs = compile_shader(gl, glow::FRAGMENT_SHADER, ShaderStage::Fragment, frag_src)?;

    unsafe {
        let program = gl.create_program().map_err(|e| EngineError::Shader {
            stage: ShaderStage::Link,
            log: format!("create_program failed: {e}"),
        })?;
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        let linked = gl.get_program_link_status(program);
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(EngineError::Shader {
                stage: ShaderStage::Link,
                log,
            });
        }
        Ok(program)
    }
}

fn gl_object<T>(what: &'static str, r: Result<T, String>) -> Result<T, EngineError> {
    r.map_err(|e| EngineError::Initialization {
        reason: format!("{what} failed: {e}"),
    })
}

pub struct GlRenderer {
    program: glow::NativeProgram,
    vao: glow::NativeVertexArray,
    vertex_buffer: glow::NativeBuffer,
    texcoord_buffer: glow::NativeBuffer,
    index_buffer: glow::NativeBuffer,
    texture: glow::NativeTexture,
    locations: Locations,
}

impl GlRenderer {
    /// Create the shader program, buffers, and video texture. Called once,
    /// lazily, when the media pipeline first reports it can play through.
    pub fn new(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<Self, EngineError> {
        let program = compile_program(gl, vert_src, frag_src)?;
        let locations = Locations::resolve(gl, program)?;

        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear_depth_f32(1.0);
            gl.disable(glow::DEPTH_TEST);

            let vao = gl_object("create_vertex_array", gl.create_vertex_array())?;
            let vertex_buffer = gl_object("create_buffer", gl.create_buffer())?;
            let texcoord_buffer = gl_object("create_buffer", gl.create_buffer())?;
            let index_buffer = gl_object("create_buffer", gl.create_buffer())?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(texcoord_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&TEXCOORDS),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&INDICES),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);

            // Video texture: linear filtering, clamp to edge.
            let texture = gl_object("create_texture", gl.create_texture())?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            logi!("RENDER", "GL resources ready (program + quad buffers + video texture)");

            Ok(Self {
                program,
                vao,
                vertex_buffer,
                texcoord_buffer,
                index_buffer,
                texture,
                locations,
            })
        }
    }

    /// Sample the latest decoded frame into the video texture. Callers gate
    /// on decode readiness; the sampled content is undefined otherwise.
    ///
    /// No Y flip: the frame's origin already matches the texture-coordinate
    /// origin (the vertex shader compensates with its Y sign flip).
    fn upload_frame(&self, gl: &glow::Context, frame: FrameRef<'_>) {
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            // Tightly packed RGB rows are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                frame.width as i32,
                frame.height as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(frame.pixels)),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    /// Produce one complete, correctly projected frame on the quad.
    pub fn draw(
        &mut self,
        gl: &glow::Context,
        frame: FrameRef<'_>,
        quad: &QuadGeometry,
        projection: &ProjectionState,
        canvas_w: u32,
        canvas_h: u32,
    ) {
        self.upload_frame(gl, frame);

        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));

            // Fresh vertex data each frame (the undewarp recomputation).
            // In-place reupload of the same buffer object; observably
            // equivalent to recreating the buffer, without the churn.
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&quad.vertices),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(self.locations.a_position);
            gl.vertex_attrib_pointer_f32(self.locations.a_position, 2, glow::FLOAT, false, 0, 0);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.texcoord_buffer));
            gl.enable_vertex_attrib_array(self.locations.a_texcoord);
            gl.vertex_attrib_pointer_f32(self.locations.a_texcoord, 2, glow::FLOAT, false, 0, 0);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.index_buffer));

            gl.uniform_matrix_4_f32_slice(
                Some(&self.locations.u_perspective),
                false,
                &projection.perspective.to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                Some(&self.locations.u_view),
                false,
                &projection.view.to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                Some(&self.locations.u_model),
                false,
                &projection.model.to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                Some(&self.locations.u_cartesian),
                false,
                &projection.cartesian.to_cols_array(),
            );

            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.uniform_1_i32(Some(&self.locations.u_tex), 0);

            gl.viewport(0, 0, canvas_w as i32, canvas_h as i32);
            gl.draw_elements(glow::TRIANGLES, INDICES.len() as i32, glow::UNSIGNED_SHORT, 0);

            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    /// Release every GPU object of this renderer. Called on stop so teardown
    /// is deterministic rather than waiting on the context's demise.
    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            gl.delete_buffer(self.vertex_buffer);
            gl.delete_buffer(self.texcoord_buffer);
            gl.delete_buffer(self.index_buffer);
            gl.delete_texture(self.texture);
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
        logi!("RENDER", "GL resources released");
    }
}

/// One-tick adapter binding the GL renderer, its context, and the current
/// canvas size to the scheduler's sink seam.
pub struct GlFrameSink<'a> {
    pub gl: &'a glow::Context,
    pub renderer: &'a mut GlRenderer,
    pub canvas: (u32, u32),
}

impl FrameSink for GlFrameSink<'_> {
    fn draw(
        &mut self,
        frame: FrameRef<'_>,
        quad: &QuadGeometry,
        projection: &ProjectionState,
    ) -> Result<(), EngineError> {
        self.renderer
            .draw(self.gl, frame, quad, projection, self.canvas.0, self.canvas.1);
        Ok(())
    }
}
