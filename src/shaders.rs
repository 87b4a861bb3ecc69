//! Shader sources
//!
//! WGSL is embedded at compile time; the entry point names below are the
//! ones the pipelines look up.

/// `init` and `update` compute stages
pub const LIFE_COMPUTE_SHADER: &str = include_str!("shaders/life_compute.wgsl");

/// `vs_main` / `fs_main` presentation stages
pub const LIFE_RENDER_SHADER: &str = include_str!("shaders/life_render.wgsl");

pub const INIT_ENTRY_POINT: &str = "init";
pub const UPDATE_ENTRY_POINT: &str = "update";
pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Invocation tile edge shared by both compute stages
pub const WORKGROUP_SIZE: (u32, u32) = (8, 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_are_declared() {
        assert!(LIFE_COMPUTE_SHADER.contains(&format!("fn {INIT_ENTRY_POINT}(")));
        assert!(LIFE_COMPUTE_SHADER.contains(&format!("fn {UPDATE_ENTRY_POINT}(")));
        assert!(LIFE_RENDER_SHADER.contains(&format!("fn {VERTEX_ENTRY_POINT}(")));
        assert!(LIFE_RENDER_SHADER.contains(&format!("fn {FRAGMENT_ENTRY_POINT}(")));
    }

    #[test]
    fn test_workgroup_size_matches_shader() {
        let declared = format!(
            "@workgroup_size({}, {}, 1)",
            WORKGROUP_SIZE.0, WORKGROUP_SIZE.1
        );
        assert_eq!(LIFE_COMPUTE_SHADER.matches(&declared).count(), 2);
    }

    #[test]
    fn test_hash_constants_match_host() {
        assert!(LIFE_COMPUTE_SHADER.contains("2747636419u"));
        assert!(LIFE_COMPUTE_SHADER.contains("2654435769u"));
    }
}
