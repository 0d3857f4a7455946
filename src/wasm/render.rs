use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Vector3;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::platform_error;
use crate::camera::OrthographicCamera;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::dispose::ReleaseResources;
use crate::error::SceneError;
use crate::graph::{Drawable, Geometry, GeometryId, Material, Node, NodeKind, SceneGraph};
use crate::lifecycle::SceneLifecycle;
use crate::surface::RenderSurface;
use crate::viewport::Viewport;

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_projection;
uniform mat4 u_view;
uniform vec3 u_offset;
uniform float u_point_size;
void main() {
    gl_Position = u_projection * u_view * vec4(a_position + u_offset, 1.0);
    gl_PointSize = u_point_size;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 out_color;
void main() {
    out_color = u_color;
}
"#;

struct Uniforms {
    projection: WebGlUniformLocation,
    view: WebGlUniformLocation,
    offset: WebGlUniformLocation,
    color: WebGlUniformLocation,
    point_size: WebGlUniformLocation,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Result<Self, SceneError> {
        let find = |name: &str| {
            gl.get_uniform_location(program, name)
                .ok_or_else(|| SceneError::Platform(format!("uniform {name} not found")))
        };
        Ok(Self {
            projection: find("u_projection")?,
            view: find("u_view")?,
            offset: find("u_offset")?,
            color: find("u_color")?,
            point_size: find("u_point_size")?,
        })
    }
}

struct GpuGeometry {
    buffer: WebGlBuffer,
    vertices: i32,
    /// Geometry version last uploaded, `None` before the first upload.
    uploaded: Option<u32>,
}

/// WebGL2 canvas appended to a caller-supplied mount element.
pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    uniforms: Uniforms,
    buffers: HashMap<GeometryId, GpuGeometry>,
    pixel_ratio: f64,
    background: Color,
    attached: bool,
}

impl WebGlSurface {
    /// Creates a canvas with a WebGL2 context and appends it to `mount`.
    pub fn attach(mount: &Element, pixel_ratio: f64) -> Result<Self, SceneError> {
        let document = mount
            .owner_document()
            .ok_or_else(|| SceneError::Platform("mount element has no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(platform_error)?
            .dyn_into()
            .map_err(|_| SceneError::Platform("created element is not a canvas".into()))?;
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(platform_error)?
            .ok_or_else(|| SceneError::Platform("WebGL2 not supported".into()))?
            .dyn_into()
            .map_err(|_| SceneError::Platform("context is not WebGL2".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let uniforms = Uniforms::locate(&gl, &program)?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SceneError::Platform("unable to create vertex array".into()))?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        mount.append_child(&canvas).map_err(platform_error)?;
        log::info!("attached WebGL2 surface (pixel ratio {pixel_ratio})");

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            uniforms,
            buffers: HashMap::new(),
            pixel_ratio,
            background: Color::BLACK,
            attached: true,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of geometries currently holding a GPU buffer.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }
}

impl RenderSurface for WebGlSurface {
    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size(self.pixel_ratio);
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", viewport.width())).ok();
        style.set_property("height", &format!("{}px", viewport.height())).ok();
        style.set_property("display", "block").ok();

        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn draw(&mut self, graph: &SceneGraph, camera: &OrthographicCamera) {
        if !self.attached {
            return;
        }
        let gl = &self.gl;
        let bg = self.background;
        gl.clear_color(bg.r, bg.g, bg.b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.uniforms.projection),
            false,
            camera.projection_matrix().as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.uniforms.view),
            false,
            camera.view_matrix().as_slice(),
        );

        for node in graph.children() {
            draw_node(gl, &self.uniforms, &mut self.buffers, node, Vector3::zeros());
        }
        gl.bind_vertex_array(None);
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for (_, gpu) in self.buffers.drain() {
            self.gl.delete_buffer(Some(&gpu.buffer));
        }
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_program(Some(&self.program));
        self.canvas.remove();
        self.attached = false;
        log::info!("detached WebGL2 surface");
    }
}

impl ReleaseResources for WebGlSurface {
    fn release_geometry(&mut self, geometry: Geometry) {
        if let Some(gpu) = self.buffers.remove(&geometry.id()) {
            self.gl.delete_buffer(Some(&gpu.buffer));
        }
    }

    // Materials live in uniforms only; nothing to free on the GPU.
    fn release_material(&mut self, _material: Material) {}
}

impl Drop for WebGlSurface {
    fn drop(&mut self) {
        self.detach();
    }
}

impl SceneLifecycle<WebGlSurface> {
    /// Attaches a WebGL2 surface to `mount` and builds the scene around it.
    pub fn mount(
        mount: &Element,
        viewport: Viewport,
        config: SceneConfig,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        let pixel_ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let surface = WebGlSurface::attach(mount, pixel_ratio)?;
        SceneLifecycle::new(surface, viewport, config)
    }
}

fn draw_node(
    gl: &GL,
    uniforms: &Uniforms,
    buffers: &mut HashMap<GeometryId, GpuGeometry>,
    node: &Node,
    parent: Vector3<f32>,
) {
    if !node.is_visible() {
        return;
    }
    let offset = parent + node.position();

    let mode = match node.kind() {
        NodeKind::Mesh(_) => Some(GL::TRIANGLES),
        NodeKind::Line(_) => Some(GL::LINE_STRIP),
        NodeKind::Points(_) => Some(GL::POINTS),
        NodeKind::Group => None,
    };
    let drawable = node.kind().drawable();
    if let (
        Some(mode),
        Some(Drawable {
            geometry: Some(geometry),
            material: Some(material),
        }),
    ) = (mode, drawable)
    {
        if let Some(vertices) = bind_geometry(gl, buffers, geometry) {
            let c = material.color;
            gl.uniform3f(Some(&uniforms.offset), offset.x, offset.y, offset.z);
            gl.uniform4f(Some(&uniforms.color), c.r, c.g, c.b, material.opacity());
            gl.uniform1f(Some(&uniforms.point_size), material.point_size);
            gl.draw_arrays(mode, 0, vertices);
        }
    }

    for child in node.children() {
        draw_node(gl, uniforms, buffers, child, offset);
    }
}

/// Binds the geometry's buffer to attribute 0, uploading it first if the
/// geometry is new or its version moved. Returns the vertex count.
fn bind_geometry(
    gl: &GL,
    buffers: &mut HashMap<GeometryId, GpuGeometry>,
    geometry: &Geometry,
) -> Option<i32> {
    if geometry.vertex_count() == 0 {
        return None;
    }
    let gpu = match buffers.entry(geometry.id()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let Some(buffer) = gl.create_buffer() else {
                log::warn!("unable to create buffer for {:?}", geometry.id());
                return None;
            };
            entry.insert(GpuGeometry {
                buffer,
                vertices: 0,
                uploaded: None,
            })
        }
    };

    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&gpu.buffer));
    if gpu.uploaded != Some(geometry.version()) {
        let data = js_sys::Float32Array::from(geometry.positions());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);
        gpu.vertices = geometry.vertex_count() as i32;
        gpu.uploaded = Some(geometry.version());
    }
    gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(0);
    Some(gpu.vertices)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, SceneError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SceneError::Platform("unable to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SceneError::Platform(format!("shader compile failed: {log}")))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, SceneError> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| SceneError::Platform("unable to create program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SceneError::Platform(format!("program link failed: {log}")))
    }
}
