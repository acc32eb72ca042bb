//! Renderer configuration.
//!
//! Serialized field names follow the html2pdf option object so the options
//! file handed to an external engine can be passed straight through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Top, right, bottom, left insets in `document.unit`.
    pub margin: [f32; 4],
    pub filename: String,
    pub image: ImageOptions,
    #[serde(rename = "html2canvas")]
    pub fidelity: FidelityOptions,
    #[serde(rename = "jsPDF")]
    pub document: DocumentOptions,
    #[serde(rename = "pagebreak")]
    pub page_break: PageBreakOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margin: [10.0, 10.0, 10.0, 10.0],
            filename: "document.pdf".to_string(),
            image: ImageOptions::default(),
            fidelity: FidelityOptions::default(),
            document: DocumentOptions::default(),
            page_break: PageBreakOptions::default(),
        }
    }
}

impl RenderOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    #[serde(rename = "type")]
    pub format: ImageFormat,
    pub quality: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Jpeg,
            quality: 0.98,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FidelityOptions {
    pub scale: f32,
    /// Allow images from other origins to be loaded into the raster.
    #[serde(rename = "useCORS")]
    pub use_cors: bool,
    pub logging: bool,
}

impl Default for FidelityOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            use_cors: true,
            logging: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOptions {
    pub unit: Unit,
    pub format: PageFormat,
    pub orientation: Orientation,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            unit: Unit::Mm,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mm,
    Cm,
    In,
    Pt,
    Px,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Letter,
    Legal,
    A4,
    A5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page-break strategies, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBreakOptions {
    pub mode: Vec<PageBreakMode>,
}

impl Default for PageBreakOptions {
    fn default() -> Self {
        Self {
            mode: vec![
                PageBreakMode::AvoidAll,
                PageBreakMode::Css,
                PageBreakMode::Legacy,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageBreakMode {
    /// never split an element across pages
    AvoidAll,
    /// honor `break-before` / `break-after`
    Css,
    Legacy,
}
