use anyhow::anyhow;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use lumen_gl::gl;
use lumen_gl::{
    drain_errors, Bindable, ComponentType, Gl, GlContext, IndexBuffer, Renderer, ShaderProgram,
    VertexArray, VertexBuffer, VertexLayout,
};
use std::path::{Path, PathBuf};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// Shader used when none is given on the command line, relative to the crate root.
const DEFAULT_SHADER: &str = "res/shaders/Basic.shader";

#[rustfmt::skip]
const POSITIONS: [f32; 8] = [
    -0.5, -0.5, // 0
     0.5, -0.5, // 1
     0.5,  0.5, // 2
    -0.5,  0.5, // 3
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// The shader path: first command-line argument, or the bundled shader.
fn shader_path() -> PathBuf {
    match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_SHADER),
    }
}

/// A quad whose red channel bounces between 0 and 1.
struct Quad {
    gl: Gl,
    vertex_array: VertexArray,
    // referenced by `vertex_array`
    _vertices: VertexBuffer,
    indices: IndexBuffer,
    program: ShaderProgram,
    renderer: Renderer,
    r: f32,
    increment: f32,
}

impl Quad {
    fn new(gl: &Gl, shader: &Path) -> anyhow::Result<Quad> {
        let mut vertex_array = VertexArray::new(gl)?;
        let vertices = VertexBuffer::new(gl, &POSITIONS)?;
        let mut layout = VertexLayout::new();
        layout.push(ComponentType::Float, 2);
        vertex_array.add_buffer(&vertices, &layout);

        let indices = IndexBuffer::new(gl, &INDICES)?;

        let program = ShaderProgram::from_file(gl, shader)?;
        program.bind();
        program.set_uniform_4f("u_Color", 0.2, 0.3, 0.8, 1.0);

        vertex_array.unbind();
        vertices.unbind();
        indices.unbind();
        program.unbind();

        Ok(Quad {
            gl: gl.clone(),
            vertex_array,
            _vertices: vertices,
            indices,
            program,
            renderer: Renderer::new(gl),
            r: 0.0,
            increment: 0.05,
        })
    }

    fn frame(&mut self) {
        self.renderer.clear();

        self.program.bind();
        self.program.set_uniform_4f("u_Color", self.r, 0.3, 0.8, 1.0);
        self.renderer.draw(&self.vertex_array, &self.indices, &self.program);

        if self.r > 1.0 {
            self.increment = -0.05;
        } else if self.r < 0.0 {
            self.increment = 0.05;
        }
        self.r += self.increment;

        drain_errors(&*self.gl);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let el = EventLoop::new();
    let wb = WindowBuilder::new()
        .with_title("lumen")
        .with_inner_size(LogicalSize::new(WIDTH, HEIGHT));
    let windowed_context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(true)
        .build_windowed(wb, &el)
        .map_err(|e| anyhow!("failed to create the OpenGL context: {}", e))?;
    let windowed_context = unsafe {
        windowed_context
            .make_current()
            .map_err(|(_, e)| anyhow!("failed to make the OpenGL context current: {}", e))?
    };

    // load opengl API
    let gl = GlContext::load_with(|s| windowed_context.get_proc_address(s) as *const _);
    if let Some(version) = GlContext::version() {
        tracing::info!("OpenGL {}", version);
    }

    let shader = shader_path();
    let mut quad = Quad::new(&gl, &shader)?;
    tracing::info!("loaded {}", shader.display());

    el.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id,
            } if window_id == windowed_context.window().id() => *control_flow = ControlFlow::Exit,
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                windowed_context.resize(size);
                unsafe { gl::Viewport(0, 0, size.width as i32, size.height as i32) };
            }
            Event::MainEventsCleared => windowed_context.window().request_redraw(),
            Event::RedrawRequested(_) => {
                quad.frame();
                if let Err(e) = windowed_context.swap_buffers() {
                    tracing::error!("swap_buffers failed: {}", e);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}
