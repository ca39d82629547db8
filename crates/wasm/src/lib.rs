//! WebAssembly bindings for the cvpress rendering engine.
//!
//! ```javascript
//! const renderer = ResumeRenderer.fromConfig(configJson);
//! renderer.loadBasePdf(basePdfBytes);
//! renderer.loadFont("Heading", headingTtf);
//! renderer.loadFont("Body", bodyTtf);
//! renderer.setPhoto(photoBytes);
//! const pdf = renderer.render(resumeData, false);
//! ```

use indexmap::IndexMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Mask image bytes to a centered circle at `size` x `size`, returning PNG
/// bytes with transparent corners.
#[wasm_bindgen(js_name = maskToCircle)]
pub fn mask_to_circle(data: &[u8], size: u32) -> Result<Vec<u8>, JsValue> {
    template::mask_to_circle(data, size).map_err(to_js_error)
}

/// A template renderer that accumulates assets and renders resume records.
#[wasm_bindgen]
pub struct ResumeRenderer {
    config: template::TemplateConfig,
    base_pdf: Option<Vec<u8>>,
    fonts: IndexMap<String, Vec<u8>>,
    photo: Option<Vec<u8>>,
}

#[wasm_bindgen]
impl ResumeRenderer {
    /// Create a renderer from template configuration JSON.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<ResumeRenderer, JsValue> {
        let config = template::parse_config(json).map_err(to_js_error)?;
        Ok(ResumeRenderer {
            config,
            base_pdf: None,
            fonts: IndexMap::new(),
            photo: None,
        })
    }

    #[wasm_bindgen(js_name = loadBasePdf)]
    pub fn load_base_pdf(&mut self, data: &[u8]) {
        self.base_pdf = Some(data.to_vec());
    }

    /// Load TTF bytes under the logical name the configuration uses. Fonts
    /// register in load order.
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, name: &str, data: &[u8]) {
        self.fonts.insert(name.to_string(), data.to_vec());
    }

    #[wasm_bindgen(js_name = setPhoto)]
    pub fn set_photo(&mut self, data: &[u8]) {
        self.photo = Some(data.to_vec());
    }

    /// Render a resume record (a plain JS object) to PDF bytes.
    pub fn render(&self, resume: JsValue, debug: bool) -> Result<Vec<u8>, JsValue> {
        let base_pdf = self
            .base_pdf
            .as_deref()
            .ok_or_else(|| JsValue::from_str("base PDF not loaded"))?;
        let resume: serde_json::Value =
            serde_wasm_bindgen::from_value(resume).map_err(|e| JsValue::from_str(&e.to_string()))?;
        template::render(&template::RenderRequest {
            base_pdf,
            config: &self.config,
            resume: &resume,
            fonts_by_name: &self.fonts,
            photo_bytes: self.photo.as_deref(),
            debug,
        })
        .map_err(to_js_error)
    }
}

fn to_js_error(err: template::TemplateError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
