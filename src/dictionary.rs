//! Built-in attribute tables: letter sizes, numeric sizes and the color chart.
//!
//! The tables are constant for the life of the process. Name and code indexes
//! are precomputed once so both lookup directions are O(1).

use crate::utils::{is_two_digit_code, normalize_name};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttributeFamily {
    LetterSize,
    NumberSize,
    Color,
}

/// Print data for a color slot. RGB and hex exist only when CMYK does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorSwatch {
    pub cmyk: Option<[u8; 4]>,
    pub rgb: Option<[u8; 3]>,
    pub hex: Option<String>,
}

impl ColorSwatch {
    fn from_cmyk(cmyk: Option<[u8; 4]>) -> Self {
        let rgb = cmyk.map(|[c, m, y, k]| cmyk_to_rgb(c, m, y, k));
        Self {
            cmyk,
            rgb,
            hex: rgb.map(rgb_to_hex),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRecord {
    pub name: String,
    pub code: String,
    pub family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSwatch>,
}

pub const LETTER_SIZES: [&str; 8] = ["PP", "P", "M", "G", "GG", "G1", "G2", "G3"];

pub const NUMBER_SIZES: [u8; 22] = [
    16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 38, 40, 42, 44, 46, 48, 50, 52, 54, 56, 58,
];

struct ColorSpec {
    name: &'static str,
    code: &'static str,
    family: Option<&'static str>,
    cmyk: Option<[u8; 4]>,
}

const fn spec(
    name: &'static str,
    code: &'static str,
    family: Option<&'static str>,
    cmyk: Option<[u8; 4]>,
) -> ColorSpec {
    ColorSpec {
        name,
        code,
        family,
        cmyk,
    }
}

const BASICAS: Option<&str> = Some("BÁSICAS");
const MESCLA: Option<&str> = Some("MESCLA");
const ESTAMPAS: Option<&str> = Some("ESTAMPAS");

// Slots 61..69 and 74 are unassigned.
#[rustfmt::skip]
const COLOR_SPEC: &[ColorSpec] = &[
    spec("TRANSPARENTE", "00", BASICAS, Some([0, 0, 0, 0])),
    spec("BRANCO", "01", BASICAS, Some([0, 0, 0, 0])),
    spec("PRETO", "02", BASICAS, Some([0, 0, 0, 100])),
    spec("TURQUESA", "03", BASICAS, Some([100, 0, 0, 0])),
    spec("PINK", "04", BASICAS, Some([0, 100, 0, 0])),
    spec("AMARELO", "05", BASICAS, Some([0, 0, 100, 0])),
    spec("RED", "06", BASICAS, None),
    spec("GREEN", "07", BASICAS, None),
    spec("BLUE", "08", BASICAS, None),
    spec("AMARELO CLARO", "09", Some("AMARELO"), Some([0, 0, 16, 0])),
    spec("MOSTARDA", "10", Some("AMARELO"), Some([0, 20, 100, 0])),
    spec("CRU", "11", Some("CAQUI"), Some([0, 0, 5, 5])),
    spec("AREIA", "12", Some("CAQUI"), Some([5, 5, 16, 7])),
    spec("CAQUI CLARO", "13", Some("CAQUI"), Some([16, 15, 37, 11])),
    spec("CAQUI ESCURO", "14", Some("MARROM"), Some([28, 31, 44, 0])),
    spec("MARROM", "15", Some("MARROM"), Some([50, 90, 90, 50])),
    spec("VERDE CLARO", "16", Some("VERDE"), Some([16, 0, 16, 0])),
    spec("BANDEIRA", "17", Some("VERDE"), Some([100, 0, 100, 0])),
    spec("VERDE PISCINA", "18", Some("VERDE"), Some([79, 7, 37, 0])),
    spec("MILITAR", "19", Some("VERDE"), Some([98, 42, 92, 50])),
    spec("MUSGO", "20", Some("VERDE"), Some([65, 40, 86, 26])),
    spec("OLIVA", "21", Some("VERDE"), Some([56, 41, 52, 11])),
    spec("AZUL CLARO", "22", Some("AZUL"), Some([16, 0, 0, 0])),
    spec("AZUL JEANS", "23", Some("AZUL"), Some([73, 40, 16, 0])),
    spec("ROYAL", "24", Some("AZUL"), Some([95, 75, 0, 0])),
    spec("MARINHO", "25", Some("AZUL"), Some([100, 78, 37, 30])),
    spec("MARINHO CLARO", "26", Some("AZUL"), Some([40, 40, 0, 60])),
    spec("LILAS BEBE", "27", Some("LILAS"), Some([16, 16, 0, 0])),
    spec("LILAS", "28", Some("LILAS"), Some([26, 26, 0, 15])),
    spec("ROXO", "29", Some("LILAS"), Some([89, 89, 0, 0])),
    spec("UVA", "30", Some("LILAS"), Some([68, 68, 0, 35])),
    spec("ROSA CLARO", "31", Some("ROSA"), Some([0, 10, 0, 0])),
    spec("ROSADO", "32", Some("ROSA"), Some([0, 26, 0, 15])),
    spec("MARSALA", "33", Some("ROSA"), Some([0, 100, 0, 50])),
    spec("VERMELHO", "34", Some("VERMELHO"), Some([0, 100, 100, 0])),
    spec("VINHO", "35", Some("VERMELHO"), Some([0, 100, 100, 40])),
    spec("BORDO", "36", Some("VERMELHO"), Some([30, 100, 100, 42])),
    spec("SALMAO", "37", Some("LARANJA"), Some([0, 10, 20, 0])),
    spec("LARANJA", "38", Some("LARANJA"), Some([0, 50, 100, 0])),
    spec("GELO", "39", Some("CINZAS"), Some([0, 0, 0, 10])),
    spec("CINZA", "40", Some("CINZAS"), Some([0, 0, 0, 50])),
    spec("CHUMBO", "41", Some("CINZAS"), Some([0, 0, 0, 80])),
    spec("AMARELO FLUOR", "42", Some("FLÚOR"), None),
    spec("LARANJA FLUOR", "43", Some("FLÚOR"), None),
    spec("ROSA FLUOR", "44", Some("FLÚOR"), None),
    spec("VERDE FLUOR", "45", Some("FLÚOR"), None),
    spec("VERMELHO MESCLA", "46", MESCLA, None),
    spec("MARINHO MESCLA", "47", MESCLA, None),
    spec("VERDE MESCLA", "48", MESCLA, None),
    spec("GELO MESCLA", "49", MESCLA, None),
    spec("CINZA MESCLA", "50", MESCLA, None),
    spec("CHUMBO MESCLA", "51", MESCLA, None),
    spec("AREIA MESCLA", "52", MESCLA, None),
    spec("PRETO MESCLA", "53", MESCLA, None),
    spec("OLIVA MESCLA", "54", MESCLA, None),
    spec("JEANS MESCLA", "55", MESCLA, None),
    spec("FERRUGEM", "56", Some("LARANJA"), None),
    spec("PETROLEO", "57", None, None),
    spec("GOIABA", "58", None, None),
    spec("ANIS", "59", None, None),
    spec("TIFFANY", "60", None, None),
    spec("INDIGO DELAVE", "70", Some("JEANS"), None),
    spec("INDIGO MEDIO", "71", Some("JEANS"), None),
    spec("INDIGO ESCURO", "72", Some("JEANS"), None),
    spec("INDIGO BLACK", "73", Some("JEANS"), None),
    spec("PRATA", "75", Some("METAIS"), None),
    spec("OURO", "76", Some("METAIS"), None),
    spec("BRONZE", "77", Some("METAIS"), None),
    spec("STONE", "78", Some("TINGIMENTO"), None),
    spec("TIE DIE", "79", Some("TINGIMENTO"), None),
    spec("MANCHADO", "80", Some("TINGIMENTO"), None),
    spec("DEGRADE", "81", Some("TINGIMENTO"), None),
    spec("GEOMETRICO", "82", ESTAMPAS, None),
    spec("RESPINGO", "83", ESTAMPAS, None),
    spec("TEXTURA", "84", ESTAMPAS, None),
    spec("XADREZ", "85", ESTAMPAS, None),
    spec("LISTRADO", "86", ESTAMPAS, None),
    spec("CAVEIRA", "87", ESTAMPAS, None),
    spec("REGGAE", "88", ESTAMPAS, None),
    spec("LOGOS STUN", "89", ESTAMPAS, None),
    spec("ESCRITO STUN", "90", ESTAMPAS, None),
    spec("MUSICA", "91", ESTAMPAS, None),
    spec("SKATE", "92", ESTAMPAS, None),
    spec("SURF", "93", ESTAMPAS, None),
    spec("FLORAL CLARO", "94", ESTAMPAS, None),
    spec("FLORAL ESCURO", "95", ESTAMPAS, None),
    spec("CAMUFLADO", "96", ESTAMPAS, None),
    spec("CAMU CINZA", "97", ESTAMPAS, None),
    spec("CAMU VERDE", "98", ESTAMPAS, None),
    spec("VARIAS", "99", ESTAMPAS, None),
];

static BUILTIN: Lazy<AttributeDictionary> = Lazy::new(AttributeDictionary::build_builtin);

/// One attribute table with its name and code indexes.
#[derive(Debug)]
struct Table {
    records: Vec<AttributeRecord>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl Table {
    fn new(records: Vec<AttributeRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        let mut by_code = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            by_name.entry(normalize_name(&record.name)).or_insert(idx);
            by_code.entry(record.code.clone()).or_insert(idx);
        }
        Self {
            records,
            by_name,
            by_code,
        }
    }

    fn by_name(&self, raw: &str) -> Option<&AttributeRecord> {
        self.by_name
            .get(&normalize_name(raw))
            .map(|&idx| &self.records[idx])
    }

    fn by_code(&self, code: &str) -> Option<&AttributeRecord> {
        self.by_code.get(code).map(|&idx| &self.records[idx])
    }

    fn preset(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{}={}", record.name, record.code))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read-only name/code tables for sizes and colors.
#[derive(Debug)]
pub struct AttributeDictionary {
    letter_sizes: Table,
    number_sizes: Table,
    colors: Table,
}

impl AttributeDictionary {
    /// The process-wide built-in dictionary.
    pub fn builtin() -> &'static AttributeDictionary {
        &BUILTIN
    }

    fn build_builtin() -> Self {
        let letter_sizes = LETTER_SIZES
            .iter()
            .enumerate()
            .map(|(idx, name)| AttributeRecord {
                name: (*name).to_string(),
                code: format!("{:02}", idx + 1),
                family: None,
                color: None,
            })
            .collect();

        let number_sizes = NUMBER_SIZES
            .iter()
            .map(|n| AttributeRecord {
                name: n.to_string(),
                code: format!("{:02}", n),
                family: None,
                color: None,
            })
            .collect();

        let colors = COLOR_SPEC
            .iter()
            .map(|row| AttributeRecord {
                name: row.name.to_string(),
                code: row.code.to_string(),
                family: row.family,
                color: Some(ColorSwatch::from_cmyk(row.cmyk)),
            })
            .collect();

        let dictionary = Self {
            letter_sizes: Table::new(letter_sizes),
            number_sizes: Table::new(number_sizes),
            colors: Table::new(colors),
        };
        tracing::debug!(
            letter_sizes = dictionary.letter_sizes.records.len(),
            number_sizes = dictionary.number_sizes.records.len(),
            colors = dictionary.colors.records.len(),
            "attribute dictionary initialized"
        );
        dictionary
    }

    fn table(&self, family: AttributeFamily) -> &Table {
        match family {
            AttributeFamily::LetterSize => &self.letter_sizes,
            AttributeFamily::NumberSize => &self.number_sizes,
            AttributeFamily::Color => &self.colors,
        }
    }

    /// Records of one family in table order.
    pub fn records(&self, family: AttributeFamily) -> &[AttributeRecord] {
        &self.table(family).records
    }

    pub fn letter_sizes(&self) -> &[AttributeRecord] {
        self.records(AttributeFamily::LetterSize)
    }

    pub fn number_sizes(&self) -> &[AttributeRecord] {
        self.records(AttributeFamily::NumberSize)
    }

    pub fn colors(&self) -> &[AttributeRecord] {
        self.records(AttributeFamily::Color)
    }

    /// Case- and diacritic-insensitive lookup by name.
    pub fn lookup(&self, family: AttributeFamily, name: &str) -> Option<&AttributeRecord> {
        self.table(family).by_name(name)
    }

    pub fn by_code(&self, family: AttributeFamily, code: &str) -> Option<&AttributeRecord> {
        self.table(family).by_code(code)
    }

    pub fn contains_name(&self, family: AttributeFamily, name: &str) -> bool {
        self.lookup(family, name).is_some()
    }

    pub fn letter_size_code(&self, name: &str) -> Option<&str> {
        self.lookup(AttributeFamily::LetterSize, name)
            .map(|record| record.code.as_str())
    }

    pub fn number_size_code(&self, name: &str) -> Option<&str> {
        self.lookup(AttributeFamily::NumberSize, name)
            .map(|record| record.code.as_str())
    }

    /// Color code for a name, or the input itself when it already is a code.
    pub fn color_code<'a>(&'a self, name_or_code: &'a str) -> Option<&'a str> {
        let trimmed = name_or_code.trim();
        if is_two_digit_code(trimmed) {
            return Some(trimmed);
        }
        self.lookup(AttributeFamily::Color, trimmed)
            .map(|record| record.code.as_str())
    }

    pub fn color_by_code(&self, code: &str) -> Option<&AttributeRecord> {
        self.by_code(AttributeFamily::Color, code)
    }

    /// Canonical color name for a code or for any spelling of a name.
    pub fn resolve_color_name(&self, name_or_code: &str) -> Option<&str> {
        let trimmed = name_or_code.trim();
        let record = if is_two_digit_code(trimmed) {
            self.color_by_code(trimmed)
        } else {
            self.lookup(AttributeFamily::Color, trimmed)
        };
        record.map(|record| record.name.as_str())
    }

    /// `Name=NN` lines in table order, for pre-populating an override editor.
    pub fn preset(&self, family: AttributeFamily) -> String {
        self.table(family).preset()
    }

    pub fn preset_colors(&self) -> String {
        self.preset(AttributeFamily::Color)
    }

    pub fn preset_letter_sizes(&self) -> String {
        self.preset(AttributeFamily::LetterSize)
    }

    pub fn preset_number_sizes(&self) -> String {
        self.preset(AttributeFamily::NumberSize)
    }
}

/// CMYK percentages to 8-bit RGB, rounding each channel.
pub fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let unit = |v: u8| f64::from(v.min(100)) / 100.0;
    let (c, m, y, k) = (unit(c), unit(m), unit(y), unit(k));
    let channel = |v: f64| (255.0 * (1.0 - v) * (1.0 - k)).round() as u8;
    [channel(c), channel(m), channel(y)]
}

pub fn rgb_to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}
