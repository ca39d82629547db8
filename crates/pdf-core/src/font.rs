//! Font handling: TrueType parsing and embedding as Type0/CIDFontType2.

use crate::{PdfError, Result};
use lopdf::{dictionary, Dictionary, Object, Stream};
use std::collections::BTreeSet;
use ttf_parser::Face;

/// A registered TrueType font and the glyphs used from it so far.
///
/// Glyph ids are used directly as CIDs (Identity-H), so text can be encoded
/// at draw time and the /W widths array and ToUnicode CMap are generated
/// from `used_chars` at save time.
///
/// The font owns its TTF bytes and re-parses them on demand for glyph
/// lookups; ttf-parser is zero-copy, so a parse is just table-directory
/// validation. Global metrics are captured once at construction.
pub struct FontData {
    /// Logical name the font was registered under
    pub name: String,
    /// Raw TTF bytes, embedded verbatim as the FontFile2 stream
    pub ttf_data: Vec<u8>,
    /// Characters drawn with this font
    pub used_chars: BTreeSet<char>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

impl FontData {
    /// Parse TTF bytes into a font ready for registration.
    pub fn from_ttf(name: &str, data: &[u8]) -> Result<Self> {
        let face = Face::parse(data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{}: {e}", name)))?;
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();

        Ok(FontData {
            name: name.to_string(),
            ttf_data: data.to_vec(),
            used_chars: BTreeSet::new(),
            units_per_em,
            ascender,
            descender,
        })
    }

    /// Record the characters of `text` as used.
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.ttf_data, 0).ok()
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face().and_then(|f| f.glyph_index(c)).map(|id| id.0)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph_id(c).is_some()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Width of `text` in font units.
    pub fn text_width(&self, text: &str) -> u32 {
        let Some(face) = self.face() else { return 0 };
        text.chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|id| face.glyph_hor_advance(id))
                    .unwrap_or(0) as u32
            })
            .sum()
    }

    /// Width of `text` in points at the given size.
    pub fn text_width_points(&self, text: &str, size: f32) -> f32 {
        self.text_width(text) as f32 / self.units_per_em as f32 * size
    }

    /// Encode text as a hex string of glyph ids for Identity-H (`<...> Tj`).
    /// Unmapped characters encode as glyph 0 (.notdef).
    pub fn encode_text_hex(&self, text: &str) -> String {
        let face = self.face();
        let mut hex = String::with_capacity(text.len() * 4);
        for c in text.chars() {
            let gid = face
                .as_ref()
                .and_then(|f| f.glyph_index(c))
                .map(|id| id.0)
                .unwrap_or(0);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex
    }

    /// Build the PDF object set for this font. The cross-references between
    /// them (FontFile2, FontDescriptor, DescendantFonts, ToUnicode) are left
    /// unset; the document fills them in as it adds each object.
    pub fn to_pdf_objects(&self) -> FontPdfObjects {
        let font_file = Stream::new(
            dictionary! { "Length1" => self.ttf_data.len() as i64 },
            self.ttf_data.clone(),
        );

        let scale = 1000.0 / self.units_per_em as f32;
        let descriptor = dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.name.as_bytes().to_vec()),
            "Flags" => 4,
            "FontBBox" => Object::Array(vec![
                Object::Integer(-1000),
                Object::Integer((self.descender as f32 * scale) as i64),
                Object::Integer(2000),
                Object::Integer((self.ascender as f32 * scale) as i64),
            ]),
            "ItalicAngle" => 0,
            "Ascent" => (self.ascender as f32 * scale) as i64,
            "Descent" => (self.descender as f32 * scale) as i64,
            "CapHeight" => (self.ascender as f32 * scale) as i64,
            "StemV" => 80,
        };

        let cid_font = dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.name.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "DW" => 1000,
            "W" => self.generate_widths_array(),
            "CIDToGIDMap" => "Identity",
        };

        let to_unicode = Stream::new(dictionary! {}, self.generate_tounicode_cmap());

        let type0 = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.name.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
        };

        FontPdfObjects {
            font_file,
            descriptor,
            cid_font,
            to_unicode,
            type0,
        }
    }

    /// Glyph id and advance for every used, mapped character, sorted by id.
    fn used_glyphs(&self) -> Vec<(u16, char, u16)> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let mut glyphs: Vec<(u16, char, u16)> = self
            .used_chars
            .iter()
            .filter_map(|&c| {
                face.glyph_index(c).map(|id| {
                    let advance = face.glyph_hor_advance(id).unwrap_or(0);
                    (id.0, c, advance)
                })
            })
            .collect();
        glyphs.sort_unstable();
        glyphs
    }

    /// /W array of per-glyph widths (PDF glyph space, 1000/em) for the
    /// glyphs actually used.
    fn generate_widths_array(&self) -> Object {
        let scale = 1000.0 / self.units_per_em as f32;
        let mut widths = Vec::new();
        let mut last_gid = None;
        for (gid, _, advance) in self.used_glyphs() {
            if last_gid == Some(gid) {
                continue;
            }
            last_gid = Some(gid);
            widths.push(Object::Integer(gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                (advance as f32 * scale) as i64,
            )]));
        }
        Object::Array(widths)
    }

    /// ToUnicode CMap mapping used glyph ids back to Unicode, for text
    /// extraction and copy/paste.
    fn generate_tounicode_cmap(&self) -> Vec<u8> {
        let mappings = self.used_glyphs();

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks are limited to 100 entries
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, c, _) in chunk {
                let mut utf16 = [0u16; 2];
                let encoded = c.encode_utf16(&mut utf16);
                let unicode_hex: String =
                    encoded.iter().map(|u| format!("{:04X}", u)).collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, unicode_hex));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }
}

/// The PDF objects making up one embedded Type0 font.
pub struct FontPdfObjects {
    pub font_file: Stream,
    pub descriptor: Dictionary,
    pub cid_font: Dictionary,
    pub to_unicode: Stream,
    pub type0: Dictionary,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("name", &self.name)
            .field("ttf_data_len", &self.ttf_data.len())
            .field("used_chars", &self.used_chars.len())
            .finish()
    }
}
