//! # 场景导出
//!
//! 导出场景到 HTML、JSON 和 XYZ 格式。
//!
//! ## 支持格式
//! - HTML: 独立页面，加载 3Dmol.js 并回放场景（模型、样式、晶胞、箭头、相机）
//! - JSON: `Scene` 的 serde 序列化
//! - XYZ: 仅原子模型
//!
//! ## 依赖关系
//! - 被 `commands/render.rs`, `commands/shell.rs` 调用
//! - 使用 `scene/mod.rs` 的 `Scene`
//! - 使用 `serde_json` 序列化

use crate::error::{MagviewError, Result};
use crate::scene::Scene;
use clap::ValueEnum;

use std::fs;
use std::path::Path;

/// 场景输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SceneFormat {
    /// Standalone HTML page (3Dmol.js viewer)
    Html,
    /// JSON scene description
    Json,
    /// XYZ model of the displayed atoms
    Xyz,
}

impl std::fmt::Display for SceneFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneFormat::Html => write!(f, "html"),
            SceneFormat::Json => write!(f, "json"),
            SceneFormat::Xyz => write!(f, "xyz"),
        }
    }
}

impl SceneFormat {
    /// 从扩展名推断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(SceneFormat::Html),
            "json" => Some(SceneFormat::Json),
            "xyz" => Some(SceneFormat::Xyz),
            _ => None,
        }
    }
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<script src="https://3Dmol.org/build/3Dmol-min.js"></script>
<style>
  html, body { margin: 0; height: 100%; }
  #viewer { width: 100%; height: 100vh; position: relative; }
</style>
</head>
<body>
<div id="viewer"></div>
<script>
const scene = __SCENE__;
const viewer = $3Dmol.createViewer(document.getElementById("viewer"), { backgroundColor: "white" });
viewer.addModel(scene.model_xyz, "xyz", { doAssembly: true });
const style = { sphere: { radius: scene.style.sphere_radius } };
if (scene.style.stick_radius !== null) {
  style.stick = { radius: scene.style.stick_radius };
}
viewer.setStyle({}, style);
scene.cell.forEach((edge) => viewer.addCylinder(edge));
scene.arrows.forEach((arrow) => viewer.addArrow(arrow));
viewer.zoomTo();
viewer.zoom(scene.camera.zoom);
scene.camera.rotations.forEach(([axis, angle]) => viewer.rotate(angle, axis));
viewer.render();
</script>
</body>
</html>
"#;

/// 生成 HTML 页面
pub fn to_html_string(scene: &Scene) -> Result<String> {
    // 避免 JSON 中的 "</" 提前结束 <script>
    let json = serde_json::to_string(scene)?.replace("</", "<\\/");
    Ok(HTML_TEMPLATE
        .replace("__TITLE__", &escape_html(&scene.title))
        .replace("__SCENE__", &json))
}

/// 生成 JSON 文本
pub fn to_json_string(scene: &Scene) -> Result<String> {
    Ok(serde_json::to_string_pretty(scene)?)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 按格式写出场景
pub fn write_scene(scene: &Scene, output_path: &Path, format: SceneFormat) -> Result<()> {
    let content = match format {
        SceneFormat::Html => to_html_string(scene)?,
        SceneFormat::Json => to_json_string(scene)?,
        SceneFormat::Xyz => scene.model_xyz.clone(),
    };

    fs::write(output_path, content).map_err(|e| MagviewError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}
