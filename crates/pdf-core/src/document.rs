//! PDF document loading, drawing, and serialization.

use crate::font::FontData;
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{
    generate_line_operators, generate_rect_operators, generate_text_operators, TextRenderContext,
};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn black() -> Self {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Color::rgb(1.0, 1.0, 1.0)
    }

    /// Parse a `#rgb` / `#rrggbb` hex color (leading `#` optional).
    /// Anything unparseable degrades to black rather than failing the draw.
    pub fn from_hex(hex: &str) -> Self {
        let clean = hex.trim().trim_start_matches('#');
        let expanded: String = if clean.len() == 3 {
            clean.chars().flat_map(|c| [c, c]).collect()
        } else {
            clean.to_string()
        };
        if expanded.len() != 6 {
            return Color::black();
        }
        match u32::from_str_radix(&expanded, 16) {
            Ok(v) => Color::from_rgb(
                ((v >> 16) & 0xFF) as u8,
                ((v >> 8) & 0xFF) as u8,
                (v & 0xFF) as u8,
            ),
            Err(_) => Color::black(),
        }
    }
}

/// A loaded PDF document being overlaid with text, images, and vector marks.
///
/// Coordinates are native PDF coordinates: origin at the bottom-left of the
/// page, y up, text positioned at its baseline. Pages are numbered from 1.
///
/// Draw calls buffer content operators per page; fonts, images, and the
/// buffered content are written into the document at [`PdfDocument::to_bytes`].
/// All registries that influence serialization order are ordered maps, so
/// identical inputs produce byte-identical output.
pub struct PdfDocument {
    doc: Document,
    fonts: BTreeMap<String, FontData>,
    embedded_fonts: BTreeMap<String, ObjectId>,
    /// page number -> font name -> page resource name ("F1", "F2", ...)
    page_fonts: BTreeMap<usize, BTreeMap<String, String>>,
    next_font_number: u32,
    /// image bytes hash -> (resource name, XObject id), deduplicating embeds
    images: BTreeMap<u64, (String, ObjectId)>,
    next_image_number: u32,
    page_content: BTreeMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(PdfDocument {
            doc,
            fonts: BTreeMap::new(),
            embedded_fonts: BTreeMap::new(),
            page_fonts: BTreeMap::new(),
            next_font_number: 0,
            images: BTreeMap::new(),
            next_image_number: 0,
            page_content: BTreeMap::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Whether the 1-based page number exists in the document.
    pub fn has_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.page_count()
    }

    /// Register a TrueType font under a logical name. The font is embedded
    /// at save time if any text was drawn with it.
    pub fn register_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        let font = FontData::from_ttf(name, ttf_data)?;
        self.fonts.insert(name.to_string(), font);
        Ok(())
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Width of `text` in points when set in the named font at `size`.
    pub fn text_width(&self, font_name: &str, text: &str, size: f32) -> Result<f32> {
        let font = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;
        Ok(font.text_width_points(text, size))
    }

    /// Draw a single run of text with its baseline at `(x, y)`.
    pub fn draw_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        font_name: &str,
        size: f32,
        color: Color,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        // validate the page before mutating any state
        self.page_id(page)?;
        let font = self
            .fonts
            .get_mut(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;
        font.add_chars(text);
        let hex = font.encode_text_hex(text);
        let ctx = TextRenderContext {
            font_resource: self.page_font_resource(page, font_name),
            font_size: size,
            color,
        };
        self.buffer(page, generate_text_operators(&hex, x, y, &ctx));
        Ok(())
    }

    /// Draw an image (JPEG or PNG bytes) stretched to the given rectangle,
    /// anchored at its bottom-left corner.
    pub fn draw_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let (resource, image_id) = self.image_ref(data)?;
        self.add_resource_entry(page_id, "XObject", &resource, image_id)?;
        self.buffer(page, generate_image_operators(&resource, x, y, width, height));
        Ok(())
    }

    /// Draw a stroked line segment.
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        thickness: f64,
    ) -> Result<()> {
        self.page_id(page)?;
        self.buffer(page, generate_line_operators(x1, y1, x2, y2, color, thickness));
        Ok(())
    }

    /// Draw a stroked rectangle outline with bottom-left corner at `(x, y)`.
    pub fn draw_rect_outline(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        thickness: f64,
    ) -> Result<()> {
        self.page_id(page)?;
        self.buffer(
            page,
            generate_rect_operators(x, y, width, height, color, thickness),
        );
        Ok(())
    }

    /// Finalize the document and serialize it: embed used fonts, wire page
    /// resources, flush buffered content into the page content streams.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.embed_fonts()?;
        self.finalize_font_resources()?;
        self.flush_content()?;
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    fn buffer(&mut self, page: usize, operators: Vec<u8>) {
        self.page_content.entry(page).or_default().extend(operators);
    }

    /// Page resource name for a font, allocated on first use per page.
    fn page_font_resource(&mut self, page: usize, font_name: &str) -> String {
        let entry = self.page_fonts.entry(page).or_default();
        if let Some(resource) = entry.get(font_name) {
            return resource.clone();
        }
        self.next_font_number += 1;
        let resource = format!("F{}", self.next_font_number);
        entry.insert(font_name.to_string(), resource.clone());
        resource
    }

    /// XObject for the image bytes, deduplicated by content hash.
    fn image_ref(&mut self, data: &[u8]) -> Result<(String, ObjectId)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let key = hasher.finish();
        if let Some(entry) = self.images.get(&key) {
            return Ok(entry.clone());
        }
        let xobject = ImageXObject::from_bytes(data)?;
        let smask_id = xobject.alpha_stream().map(|s| self.doc.add_object(s));
        let image_id = self.doc.add_object(xobject.to_stream(smask_id));
        self.next_image_number += 1;
        let resource = format!("Im{}", self.next_image_number);
        self.images.insert(key, (resource.clone(), image_id));
        Ok((resource, image_id))
    }

    /// Embed every font that has drawn text, in name order.
    fn embed_fonts(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .fonts
            .iter()
            .filter(|(name, font)| {
                !font.used_chars.is_empty() && !self.embedded_fonts.contains_key(*name)
            })
            .map(|(name, _)| name.clone())
            .collect();
        for name in names {
            let font = self
                .fonts
                .get(&name)
                .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
            let objects = font.to_pdf_objects();

            let font_file_id = self.doc.add_object(objects.font_file);

            let mut descriptor = objects.descriptor;
            descriptor.set("FontFile2", Object::Reference(font_file_id));
            let descriptor_id = self.doc.add_object(descriptor);

            let mut cid_font = objects.cid_font;
            cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
            let cid_font_id = self.doc.add_object(cid_font);

            let to_unicode_id = self.doc.add_object(objects.to_unicode);

            let mut type0 = objects.type0;
            type0.set(
                "DescendantFonts",
                Object::Array(vec![Object::Reference(cid_font_id)]),
            );
            type0.set("ToUnicode", Object::Reference(to_unicode_id));
            let type0_id = self.doc.add_object(type0);

            self.embedded_fonts.insert(name, type0_id);
        }
        Ok(())
    }

    /// Point every allocated page font resource at its embedded font object.
    fn finalize_font_resources(&mut self) -> Result<()> {
        for (page, fonts) in self.page_fonts.clone() {
            let page_id = self.page_id(page)?;
            for (font_name, resource) in fonts {
                let Some(&font_id) = self.embedded_fonts.get(&font_name) else {
                    continue;
                };
                self.add_resource_entry(page_id, "Font", &resource, font_id)?;
            }
        }
        Ok(())
    }

    fn flush_content(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content);
        for (page, operators) in buffers {
            let page_id = self.page_id(page)?;
            self.append_to_content_stream(page_id, operators)?;
        }
        Ok(())
    }

    /// Insert `name -> value_id` into a category ("Font", "XObject") of the
    /// page's resource dictionary, resolving and inlining any indirection so
    /// the edit stays local to this page.
    fn add_resource_entry(
        &mut self,
        page_id: ObjectId,
        category: &str,
        name: &str,
        value_id: ObjectId,
    ) -> Result<()> {
        let resources_obj = self
            .doc
            .get_dictionary(page_id)?
            .get(b"Resources")
            .ok()
            .cloned();
        let mut resources: Dictionary = match resources_obj {
            Some(Object::Dictionary(dict)) => dict,
            Some(Object::Reference(id)) => self.doc.get_dictionary(id)?.clone(),
            _ => Dictionary::new(),
        };
        let mut category_dict: Dictionary = match resources.get(category.as_bytes()).ok().cloned()
        {
            Some(Object::Dictionary(dict)) => dict,
            Some(Object::Reference(id)) => self.doc.get_dictionary(id)?.clone(),
            _ => Dictionary::new(),
        };
        category_dict.set(name, Object::Reference(value_id));
        resources.set(category, Object::Dictionary(category_dict));
        let mut page_dict = self.doc.get_dictionary(page_id)?.clone();
        page_dict.set("Resources", Object::Dictionary(resources));
        self.doc
            .objects
            .insert(page_id, Object::Dictionary(page_dict));
        Ok(())
    }

    /// Append operators to the page's content. The existing content (single
    /// stream, reference, or array of streams) is read out decompressed and
    /// concatenated, then replaced by one fresh uncompressed stream.
    fn append_to_content_stream(&mut self, page_id: ObjectId, operators: Vec<u8>) -> Result<()> {
        let page_dict = self.doc.get_dictionary(page_id)?.clone();

        let mut content = match page_dict.get(b"Contents") {
            Ok(contents) => self.collect_content(contents),
            Err(_) => Vec::new(),
        };
        content.extend_from_slice(&operators);

        let stream_id = self.doc.add_object(Stream::new(Dictionary::new(), content));
        let mut new_page_dict = page_dict;
        new_page_dict.set("Contents", Object::Reference(stream_id));
        self.doc
            .objects
            .insert(page_id, Object::Dictionary(new_page_dict));
        Ok(())
    }

    fn collect_content(&self, contents: &Object) -> Vec<u8> {
        match contents {
            Object::Stream(stream) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            Object::Reference(ref_id) => match self.doc.get_object(*ref_id) {
                Ok(resolved) => self.collect_content(resolved),
                Err(_) => Vec::new(),
            },
            Object::Array(parts) => {
                let mut combined = Vec::new();
                for part in parts {
                    combined.extend_from_slice(&self.collect_content(part));
                }
                combined
            }
            _ => Vec::new(),
        }
    }
}
