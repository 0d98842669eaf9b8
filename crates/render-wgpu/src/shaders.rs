/// Textured/colored quads. `tex_index` selects one of 16 bound textures.
///
/// Sampling happens inside a `switch` on a per-vertex value, which is not
/// uniform control flow, hence `textureSampleLevel` instead of `textureSample`.
pub const QUAD_SHADER: &str = r#"
struct Camera {
    view_projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0) var t0: texture_2d<f32>;
@group(1) @binding(1) var t1: texture_2d<f32>;
@group(1) @binding(2) var t2: texture_2d<f32>;
@group(1) @binding(3) var t3: texture_2d<f32>;
@group(1) @binding(4) var t4: texture_2d<f32>;
@group(1) @binding(5) var t5: texture_2d<f32>;
@group(1) @binding(6) var t6: texture_2d<f32>;
@group(1) @binding(7) var t7: texture_2d<f32>;
@group(1) @binding(8) var t8: texture_2d<f32>;
@group(1) @binding(9) var t9: texture_2d<f32>;
@group(1) @binding(10) var t10: texture_2d<f32>;
@group(1) @binding(11) var t11: texture_2d<f32>;
@group(1) @binding(12) var t12: texture_2d<f32>;
@group(1) @binding(13) var t13: texture_2d<f32>;
@group(1) @binding(14) var t14: texture_2d<f32>;
@group(1) @binding(15) var t15: texture_2d<f32>;
@group(1) @binding(16) var quad_sampler: sampler;

struct VertexInput {
    @location(0) position: vec4<f32>,
    @location(1) tex_coords: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) tex_index: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) @interpolate(flat) tex_index: u32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * in.position;
    out.tex_coords = in.tex_coords;
    out.color = in.color;
    out.tex_index = in.tex_index;
    return out;
}

fn sample_slot(index: u32, uv: vec2<f32>) -> vec4<f32> {
    switch index {
        case 0u: { return textureSampleLevel(t0, quad_sampler, uv, 0.0); }
        case 1u: { return textureSampleLevel(t1, quad_sampler, uv, 0.0); }
        case 2u: { return textureSampleLevel(t2, quad_sampler, uv, 0.0); }
        case 3u: { return textureSampleLevel(t3, quad_sampler, uv, 0.0); }
        case 4u: { return textureSampleLevel(t4, quad_sampler, uv, 0.0); }
        case 5u: { return textureSampleLevel(t5, quad_sampler, uv, 0.0); }
        case 6u: { return textureSampleLevel(t6, quad_sampler, uv, 0.0); }
        case 7u: { return textureSampleLevel(t7, quad_sampler, uv, 0.0); }
        case 8u: { return textureSampleLevel(t8, quad_sampler, uv, 0.0); }
        case 9u: { return textureSampleLevel(t9, quad_sampler, uv, 0.0); }
        case 10u: { return textureSampleLevel(t10, quad_sampler, uv, 0.0); }
        case 11u: { return textureSampleLevel(t11, quad_sampler, uv, 0.0); }
        case 12u: { return textureSampleLevel(t12, quad_sampler, uv, 0.0); }
        case 13u: { return textureSampleLevel(t13, quad_sampler, uv, 0.0); }
        case 14u: { return textureSampleLevel(t14, quad_sampler, uv, 0.0); }
        default: { return textureSampleLevel(t15, quad_sampler, uv, 0.0); }
    }
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = sample_slot(in.tex_index, in.tex_coords) * in.color;
    if color.a <= 0.0 {
        discard;
    }
    return color;
}
"#;

/// Circles drawn on quads; the fragment shader cuts the disc or ring.
pub const CIRCLE_SHADER: &str = r#"
struct Camera {
    view_projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexInput {
    @location(0) world_position: vec4<f32>,
    @location(1) local_position: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) thickness: f32,
    @location(4) fade: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) thickness: f32,
    @location(3) fade: f32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * in.world_position;
    out.local_position = in.local_position;
    out.color = in.color;
    out.thickness = in.thickness;
    out.fade = in.fade;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let edge = 1.0 - length(in.local_position);
    var alpha = smoothstep(0.0, in.fade, edge);
    alpha *= 1.0 - smoothstep(in.thickness, in.thickness + in.fade, edge);
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * alpha);
}
"#;

/// Glyph quads sampling a single-channel signed distance field atlas.
/// 0.5 in the atlas is the glyph edge.
pub const TEXT_SHADER: &str = r#"
struct Camera {
    view_projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0) var atlas: texture_2d<f32>;
@group(1) @binding(1) var atlas_sampler: sampler;

struct VertexInput {
    @location(0) position: vec4<f32>,
    @location(1) tex_coords: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * in.position;
    out.tex_coords = in.tex_coords;
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let field = textureSample(atlas, atlas_sampler, in.tex_coords).r - 0.5;
    let width = max(fwidth(field), 0.0001);
    let alpha = smoothstep(-width, width, field);
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shader_has_both_entry_points() {
        for src in [QUAD_SHADER, CIRCLE_SHADER, TEXT_SHADER] {
            assert!(src.contains("fn vs_main("));
            assert!(src.contains("fn fs_main("));
        }
    }

    #[test]
    fn quad_shader_binds_sixteen_textures() {
        for i in 0..16 {
            assert!(QUAD_SHADER.contains(&format!("var t{i}: texture_2d<f32>;")));
        }
        assert!(QUAD_SHADER.contains("@binding(16) var quad_sampler"));
    }
}
