//! Python generator for Blender
//!
//! [`BlenderScript`] rebuilds a [`Scene`] with `bpy` calls and ends with the
//! output step for the job's [`OutputKind`]. The script starts from an empty
//! factory scene so nothing from the user's startup file leaks in.

use std::fs;
use std::path::Path;

use synthscene_core::{
    Camera, FileBasedObject, Geometry, Light, Material, Mesh, ObjectKind, Scene, SceneObject,
};
use synthscene_math::{Color, Quat, Vec3};

use super::Engine;
use crate::output::{OutputKind, RenderPasses};
use crate::renderer::{RenderError, RenderJob};

/// Functions shared by every generated script
const PRELUDE: &str = r#"import os

import bmesh
import bpy


def link(obj):
    bpy.context.scene.collection.objects.link(obj)
    return obj


def set_transform(obj, location, quaternion, scale):
    obj.rotation_mode = "QUATERNION"
    obj.location = location
    obj.rotation_quaternion = quaternion
    obj.scale = scale


def insert_key(obj, data_path, frame, value):
    setattr(obj, data_path, value)
    obj.keyframe_insert(data_path=data_path, frame=frame)


def make_linear(obj):
    action = obj.animation_data.action if obj.animation_data else None
    if action is None:
        return
    for fcurve in getattr(action, "fcurves", []):
        for point in fcurve.keyframe_points:
            point.interpolation = "LINEAR"


def primitive_mesh(name, kind, segments=32, rings=16):
    bm = bmesh.new()
    if kind == "box":
        bmesh.ops.create_cube(bm, size=1.0)
    elif kind == "plane":
        bmesh.ops.create_grid(bm, x_segments=1, y_segments=1, size=0.5)
    else:
        bmesh.ops.create_uvsphere(bm, u_segments=segments, v_segments=rings, radius=0.5)
    data = bpy.data.meshes.new(name)
    bm.to_mesh(data)
    bm.free()
    return data


def buffer_mesh(name, vertices, faces):
    data = bpy.data.meshes.new(name)
    data.from_pydata(vertices, [], faces)
    data.update()
    return data


def flat_material(name, color):
    mat = bpy.data.materials.new(name)
    mat.use_nodes = True
    nodes = mat.node_tree.nodes
    nodes.clear()
    emission = nodes.new("ShaderNodeEmission")
    emission.inputs["Color"].default_value = color
    output = nodes.new("ShaderNodeOutputMaterial")
    mat.node_tree.links.new(emission.outputs["Emission"], output.inputs["Surface"])
    return mat


def phong_material(name, color, roughness):
    mat = bpy.data.materials.new(name)
    mat.use_nodes = True
    bsdf = mat.node_tree.nodes["Principled BSDF"]
    bsdf.inputs["Base Color"].default_value = color
    bsdf.inputs["Roughness"].default_value = roughness
    return mat


def import_asset(name, filepath, fmt):
    before = set(bpy.data.objects)
    if fmt == "obj":
        bpy.ops.wm.obj_import(filepath=filepath, forward_axis="Y", up_axis="Z")
    elif fmt == "ply":
        bpy.ops.wm.ply_import(filepath=filepath)
    elif fmt in ("glb", "gltf"):
        bpy.ops.import_scene.gltf(filepath=filepath)
    elif fmt == "fbx":
        bpy.ops.import_scene.fbx(filepath=filepath)
    imported = [o for o in bpy.data.objects if o not in before]
    if len(imported) == 1:
        obj = imported[0]
    else:
        obj = link(bpy.data.objects.new(name, None))
        for child in imported:
            if child.parent is None:
                child.parent = obj
    obj.name = name
    return obj
"#;

/// Render geometry formats Blender can import
pub const IMPORT_FORMATS: &[&str] = &["obj", "ply", "glb", "gltf", "fbx"];

/// A generated Blender Python script
#[derive(Clone, Debug, PartialEq)]
pub struct BlenderScript {
    source: String,
}

impl BlenderScript {
    /// Generate the script for `job` on `engine`
    pub fn generate(job: &RenderJob<'_>, engine: Engine) -> Result<Self, RenderError> {
        let mut gen = Generator::new();
        gen.raw(PRELUDE);
        gen.blank();
        gen.settings(job, engine);
        gen.world(job.scene);

        for (index, (key, object)) in job.scene.iter().enumerate() {
            gen.object(object, index, job.scene.camera == Some(key))?;
        }

        gen.passes(job);
        gen.output(job);
        Ok(Self { source: gen.finish() })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn write(&self, path: &Path) -> Result<(), RenderError> {
        fs::write(path, &self.source)?;
        Ok(())
    }
}

struct Generator {
    lines: Vec<String>,
}

impl Generator {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn raw(&mut self, block: &str) {
        self.lines.extend(block.trim_end().lines().map(str::to_string));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(mut self) -> String {
        self.blank();
        self.lines.join("\n")
    }

    fn settings(&mut self, job: &RenderJob<'_>, engine: Engine) {
        let scene = job.scene;
        self.line("bpy.ops.wm.read_factory_settings(use_empty=True)");
        self.line("scene = bpy.context.scene");
        match engine {
            Engine::Eevee => {
                // Renamed in Blender 4.2
                self.line("engines = bpy.types.RenderSettings.bl_rna.properties[\"engine\"].enum_items.keys()");
                self.line("scene.render.engine = \"BLENDER_EEVEE_NEXT\" if \"BLENDER_EEVEE_NEXT\" in engines else \"BLENDER_EEVEE\"");
                self.line(format!("scene.eevee.taa_render_samples = {}", job.samples));
            }
            Engine::Cycles => {
                self.line("scene.render.engine = \"CYCLES\"");
                self.line(format!("scene.cycles.samples = {}", job.samples));
            }
            Engine::Workbench => self.line("scene.render.engine = \"BLENDER_WORKBENCH\""),
        }
        self.line(format!("scene.render.resolution_x = {}", job.width));
        self.line(format!("scene.render.resolution_y = {}", job.height));
        self.line("scene.render.resolution_percentage = 100");
        self.line(format!("scene.frame_start = {}", scene.frame_start));
        self.line(format!("scene.frame_end = {}", scene.frame_end));
        self.line(format!("scene.render.fps = {}", scene.frame_rate));
        self.blank();
    }

    fn world(&mut self, scene: &Scene) {
        self.line("world = bpy.data.worlds.new(\"World\")");
        self.line("world.use_nodes = True");
        self.line(format!(
            "world.node_tree.nodes[\"Background\"].inputs[\"Color\"].default_value = {}",
            py_color(scene.ambient_illumination().to_linear())
        ));
        self.line("scene.world = world");
        self.blank();
    }

    fn object(&mut self, object: &SceneObject, index: usize, is_active_camera: bool) -> Result<(), RenderError> {
        let name = object
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_{}", object.kind.kind_name(), index));
        let name_lit = py_str(&name);

        match &object.kind {
            ObjectKind::Camera(camera) => {
                self.camera(&name_lit, camera);
                if is_active_camera {
                    self.line("scene.camera = obj");
                }
            }
            // Ambient light is part of the world color
            ObjectKind::Light(Light::Ambient { .. }) => return Ok(()),
            ObjectKind::Light(light) => self.light(&name_lit, light),
            ObjectKind::Mesh(mesh) => self.mesh(&name_lit, mesh),
            ObjectKind::FileBased(file) => self.asset(&name_lit, file)?,
        }

        // Index 0 means "no object" in the object index pass
        self.line(format!("obj.pass_index = {}", index + 1));
        self.transform(object);
        self.blank();
        Ok(())
    }

    fn camera(&mut self, name: &str, camera: &Camera) {
        self.line(format!("data = bpy.data.cameras.new({})", name));
        match camera {
            Camera::Perspective { focal_length, sensor_width } => {
                self.line("data.type = \"PERSP\"");
                self.line(format!("data.lens = {}", py_float(*focal_length)));
                self.line(format!("data.sensor_width = {}", py_float(*sensor_width)));
                self.line("data.sensor_fit = \"HORIZONTAL\"");
            }
            Camera::Orthographic { orthographic_scale } => {
                self.line("data.type = \"ORTHO\"");
                self.line(format!("data.ortho_scale = {}", py_float(*orthographic_scale)));
            }
            Camera::Undefined => {}
        }
        self.line(format!("obj = link(bpy.data.objects.new({}, data))", name));
    }

    fn light(&mut self, name: &str, light: &Light) {
        let kind = match light {
            Light::Point { .. } => "POINT",
            _ => "SUN",
        };
        self.line(format!("data = bpy.data.lights.new({}, type=\"{}\")", name, kind));
        self.line(format!("data.color = {}", py_rgb(light.color().to_linear())));
        self.line(format!("data.energy = {}", py_float(light.intensity().unwrap_or(1.0))));
        self.line(format!("obj = link(bpy.data.objects.new({}, data))", name));
    }

    fn mesh(&mut self, name: &str, mesh: &Mesh) {
        match &mesh.geometry {
            Geometry::Box => self.line(format!("data = primitive_mesh({}, \"box\")", name)),
            Geometry::Plane => self.line(format!("data = primitive_mesh({}, \"plane\")", name)),
            Geometry::Sphere { segments, rings } => self.line(format!(
                "data = primitive_mesh({}, \"sphere\", segments={}, rings={})",
                name, segments, rings
            )),
            Geometry::Buffer(buffer) => {
                let vertices: Vec<String> = buffer.vertices.iter().map(|v| py_vec3(*v)).collect();
                let faces: Vec<String> = buffer
                    .faces
                    .iter()
                    .map(|[a, b, c]| format!("({}, {}, {})", a, b, c))
                    .collect();
                self.line(format!(
                    "data = buffer_mesh({}, [{}], [{}])",
                    name,
                    vertices.join(", "),
                    faces.join(", ")
                ));
            }
        }
        self.line(format!("obj = link(bpy.data.objects.new({}, data))", name));

        match mesh.material {
            Material::Flat { color } => self.line(format!(
                "obj.data.materials.append(flat_material({}, {}))",
                name,
                py_color(color.to_linear())
            )),
            Material::Phong { color, shininess } => self.line(format!(
                "obj.data.materials.append(phong_material({}, {}, {}))",
                name,
                py_color(color.to_linear()),
                py_float(phong_roughness(shininess))
            )),
            Material::Shadow => {
                self.line("obj.is_shadow_catcher = True");
                self.line("scene.render.film_transparent = True");
            }
        }
    }

    fn asset(&mut self, name: &str, file: &FileBasedObject) -> Result<(), RenderError> {
        let format = file
            .render_format()
            .filter(|fmt| IMPORT_FORMATS.contains(&fmt.as_str()))
            .ok_or_else(|| RenderError::UnsupportedAsset(file.render_filename.clone()))?;
        self.line(format!(
            "obj = import_asset({}, os.path.abspath({}), \"{}\")",
            name,
            py_str(&file.render_filename.to_string_lossy()),
            format
        ));
        self.line(format!("obj[\"asset_id\"] = {}", py_str(&file.asset_id)));
        self.line(format!("obj[\"mass\"] = {}", py_float(file.physics.mass)));
        self.line(format!("obj[\"friction\"] = {}", py_float(file.physics.friction)));
        self.line(format!("obj[\"restitution\"] = {}", py_float(file.physics.restitution)));
        Ok(())
    }

    fn transform(&mut self, object: &SceneObject) {
        let transform = &object.object.transform;
        self.line(format!(
            "set_transform(obj, {}, {}, {})",
            py_vec3(transform.position),
            py_quat(transform.rotation),
            py_vec3(transform.scale)
        ));

        let keys = &object.object.keyframes;
        if keys.is_empty() {
            return;
        }
        for (frame, position) in &keys.position {
            self.line(format!("insert_key(obj, \"location\", {}, {})", frame, py_vec3(*position)));
        }
        for (frame, rotation) in &keys.rotation {
            self.line(format!(
                "insert_key(obj, \"rotation_quaternion\", {}, {})",
                frame,
                py_quat(*rotation)
            ));
        }
        for (frame, scale) in &keys.scale {
            self.line(format!("insert_key(obj, \"scale\", {}, {})", frame, py_vec3(*scale)));
        }
        self.line("make_linear(obj)");
    }

    fn passes(&mut self, job: &RenderJob<'_>) {
        if !job.passes.has_data_passes() || job.kind.is_scene_file() {
            return;
        }
        self.line("view_layer = scene.view_layers[0]");
        let layers = [
            (RenderPasses::DEPTH, "use_pass_z", "Depth", "depth"),
            (RenderPasses::NORMAL, "use_pass_normal", "Normal", "normal"),
            (RenderPasses::SEGMENTATION, "use_pass_object_index", "IndexOB", "segmentation"),
            (RenderPasses::FLOW, "use_pass_vector", "Vector", "flow"),
        ];
        for (pass, property, _, _) in &layers {
            if job.passes.contains(*pass) {
                self.line(format!("view_layer.{} = True", property));
            }
        }

        self.line("scene.use_nodes = True");
        self.line("tree = scene.node_tree");
        self.line("tree.nodes.clear()");
        self.line("render_layers = tree.nodes.new(\"CompositorNodeRLayers\")");
        self.line("composite = tree.nodes.new(\"CompositorNodeComposite\")");
        self.line("tree.links.new(render_layers.outputs[\"Image\"], composite.inputs[\"Image\"])");
        self.line("file_output = tree.nodes.new(\"CompositorNodeOutputFile\")");
        self.line("file_output.format.file_format = \"OPEN_EXR_MULTILAYER\"");
        self.line(format!(
            "file_output.base_path = os.path.abspath({})",
            py_str(&job.kind.data_pass_prefix(&job.output).to_string_lossy())
        ));
        self.line("file_output.layer_slots.clear()");
        for (pass, _, socket, layer) in &layers {
            if job.passes.contains(*pass) {
                self.line(format!("file_output.layer_slots.new(\"{}\")", layer));
                self.line(format!(
                    "tree.links.new(render_layers.outputs[\"{}\"], file_output.inputs[\"{}\"])",
                    socket, layer
                ));
            }
        }
        self.blank();
    }

    fn output(&mut self, job: &RenderJob<'_>) {
        let target = py_str(&job.output.to_string_lossy());
        match &job.kind {
            OutputKind::Still => {
                let format = still_format(&job.output);
                self.line(format!("scene.render.image_settings.file_format = \"{}\"", format));
                self.line("scene.frame_set(scene.frame_start)");
                self.line(format!("scene.render.filepath = os.path.abspath({})", target));
                self.line("bpy.ops.render.render(write_still=True)");
            }
            OutputKind::ImageSequence { prefix } => {
                self.line("scene.render.image_settings.file_format = \"PNG\"");
                let prefix_text = prefix.to_string_lossy();
                let mut filepath = format!("os.path.abspath({})", py_str(&prefix_text));
                if prefix_text.ends_with('/') {
                    // abspath drops the trailing separator of directory prefixes
                    filepath = format!("os.path.join({}, \"\")", filepath);
                }
                self.line(format!("scene.render.filepath = {}", filepath));
                self.line("bpy.ops.render.render(animation=True)");
            }
            OutputKind::Video => {
                self.line("scene.render.image_settings.file_format = \"FFMPEG\"");
                self.line(format!("scene.render.ffmpeg.format = \"{}\"", video_container(&job.output)));
                self.line("scene.render.ffmpeg.codec = \"H264\"");
                self.line(format!("target = os.path.abspath({})", target));
                self.line("scene.render.filepath = os.path.splitext(target)[0] + \"_\"");
                self.line("bpy.ops.render.render(animation=True)");
                // Blender appends the frame range to movie names
                self.line("os.replace(scene.render.frame_path(frame=scene.frame_start), target)");
            }
            OutputKind::SceneFile => {
                self.line(format!("bpy.ops.wm.save_as_mainfile(filepath=os.path.abspath({}))", target));
            }
        }
    }
}

/// Principled roughness giving highlights of similar width to a Phong exponent
fn phong_roughness(shininess: f32) -> f32 {
    (2.0 / (shininess.max(0.0) + 2.0)).sqrt()
}

fn still_format(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "JPEG",
        "exr" => "OPEN_EXR",
        "tif" | "tiff" => "TIFF",
        _ => "PNG",
    }
}

fn video_container(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mov" => "QUICKTIME",
        "avi" => "AVI",
        "mkv" => "MKV",
        _ => "MPEG4",
    }
}

/// Python string literal; JSON string escapes are valid Python
fn py_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.escape_default()))
}

fn py_float(v: f32) -> String {
    if v.is_finite() {
        format!("{:?}", v)
    } else {
        format!("float('{}')", v)
    }
}

fn py_vec3(v: Vec3) -> String {
    format!("({}, {}, {})", py_float(v.x), py_float(v.y), py_float(v.z))
}

fn py_quat(q: Quat) -> String {
    let [w, x, y, z] = q.to_blender();
    format!("({}, {}, {}, {})", py_float(w), py_float(x), py_float(y), py_float(z))
}

fn py_rgb(c: Color) -> String {
    format!("({}, {}, {})", py_float(c.r), py_float(c.g), py_float(c.b))
}

fn py_color(c: Color) -> String {
    format!("({}, {}, {}, {})", py_float(c.r), py_float(c.g), py_float(c.b), py_float(c.a))
}
