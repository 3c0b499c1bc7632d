use crate::error::{BloodworkError, Result};
use crate::types::{AnalysisContext, SpecialTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// Default value functions for serde
fn default_column_separator() -> char {
    '¦'
}

fn default_century_prefix() -> String {
    "20".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Line scanning parameters
    #[serde(default)]
    pub parser: ParserConfig,
    /// Analyses to look for, how to group them and how to rename them
    #[serde(default)]
    pub catalog: RuleCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Character delimiting columns in header and result lines
    #[serde(default = "default_column_separator")]
    pub column_separator: char,
    /// Prepended to two-digit years ("24" -> "2024")
    #[serde(default = "default_century_prefix")]
    pub century_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            column_separator: default_column_separator(),
            century_prefix: default_century_prefix(),
        }
    }
}

/// One analysis the rule engine looks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSpec {
    pub name: String,
    /// Raw unit as printed in the report
    #[serde(default)]
    pub unit: String,
    /// Advisory only: a missing required analysis is logged, never fatal
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AnalysisContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialTag>,
}

impl AnalysisSpec {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            required: false,
            context: None,
            special: None,
        }
    }

    pub fn with_special(mut self, special: SpecialTag) -> Self {
        self.special = Some(special);
        self
    }

    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// A display group: its results are printed together, separated from the
/// next group by a blank line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub analyses: Vec<AnalysisSpec>,
}

impl GroupSpec {
    fn untitled(analyses: Vec<AnalysisSpec>) -> Self {
        Self {
            title: None,
            analyses,
        }
    }

    fn titled(title: &str, analyses: Vec<AnalysisSpec>) -> Self {
        Self {
            title: Some(title.to_string()),
            analyses,
        }
    }
}

/// Static display taxonomy plus the unit and name mapping tables.
/// Loaded once, never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub groups: Vec<GroupSpec>,
    /// Raw unit -> display unit; unmapped units pass through
    #[serde(default)]
    pub unit_mapping: HashMap<String, String>,
    /// Catalog analysis name -> display name; unmapped names pass through
    #[serde(default)]
    pub name_mapping: HashMap<String, String>,
}

impl RuleCatalog {
    pub fn display_unit<'a>(&'a self, raw_unit: &'a str) -> &'a str {
        self.unit_mapping
            .get(raw_unit)
            .map(String::as_str)
            .unwrap_or(raw_unit)
    }

    pub fn display_name<'a>(&'a self, analysis_name: &'a str) -> &'a str {
        self.name_mapping
            .get(analysis_name)
            .map(String::as_str)
            .unwrap_or(analysis_name)
    }

    pub fn analysis_count(&self) -> usize {
        self.groups.iter().map(|g| g.analyses.len()).sum()
    }
}

fn mapping(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

fn default_unit_mapping() -> HashMap<String, String> {
    mapping(&[
        ("x10*9/L", "G/L"),
        ("x10*12/L", "T/L"),
        ("g/dL", "g/dL"),
        ("fL", "fL"),
        ("pg", "pg"),
        ("%", "%"),
        ("mmol/L", "mmol/L"),
        ("µmol/L", "µmol/L"),
        ("mg/L", "mg/L"),
        ("ng/L", "ng/L"),
        ("g/L", "g/L"),
        ("U/L", "UI/L"),
        ("UI/L", "UI/L"),
        ("g/mol", "g/mol"),
        ("g/mmol", "g/mol"),
        ("mL/min/1.73m²", "mL/min/1.73m²"),
        ("mm Hg", "mmHg"),
        ("L/min", "L/min"),
    ])
}

fn default_name_mapping() -> HashMap<String, String> {
    mapping(&[
        ("Leucocytes", "Leucocytes"),
        ("Hémoglobine", "Hb"),
        ("VGM", "VGM"),
        ("Plaquettes", "Plaquettes"),
        ("Polynucléaires neutrophiles", "PNN"),
        ("Polynucléaires éosinophiles", "PEo"),
        ("Polynucléaires basophiles", "PBa"),
        ("Lymphocytes", "Lymphocytes"),
        ("Monocytes", "Monocytes"),
        ("Sodium", "Na"),
        ("Potassium", "K"),
        ("Chlorure", "Cl"),
        ("Bicarbonate", "Bicarbonate"),
        ("Urée", "Urée"),
        ("Créatinine", "Créatinine"),
        ("Créatininémie", "Créatininémie"),
        ("CRP", "CRP"),
        ("Protéines", "Protéines"),
        ("Hématies", "Hématies"),
        ("Hématocrite", "Hématocrite"),
        ("TCMH", "TCMH"),
        ("CCMH", "CCMH"),
        ("IDR", "IDR"),
        ("VMP", "VMP"),
        ("Réticulocytes", "Réticulocytes"),
        ("Trou anionique", "Trou anionique"),
        ("DFG calculé par MDRD", "DFG"),
        ("DFG calculé par CKD-EPI", "DFG"),
        ("Calcium", "Ca"),
        ("Phosphates", "Phosphates"),
        ("Magnésium", "Magnésium"),
        ("ASAT", "ASAT"),
        ("ALAT", "ALAT"),
        ("GGT", "GGT"),
        ("Gamma GT", "GGT"),
        ("PAL", "PAL"),
        ("Phosphatases alcalines", "PAL"),
        ("Bilirubine", "Bilirubine"),
        ("Bilirubine totale", "Bilirubine"),
        ("Lipase", "Lipase"),
        ("LDH", "LDH"),
        ("Créatine kinase", "CK"),
        ("BNP", "BNP"),
        ("pH", "pH"),
        ("pO2", "PaO2"),
        ("pCO2", "PaCO2"),
        ("Lactate", "Lactate"),
        ("Débit O2", "Débit O2"),
        ("HbA1c", "HbA1c"),
        ("Hémoglobine A1c", "HbA1c"),
        ("SAA", "SAA"),
        ("Protéine sérique amyloide A", "SAA"),
        ("Protéinurie/Créatininurie", "Protéinurie/Créatininurie"),
        ("Protéines/Créatinine", "Protéinurie/Créatininurie"),
    ])
}

fn default_groups() -> Vec<GroupSpec> {
    use AnalysisContext::Urine;
    use SpecialTag::{ConvertMmolToMol, Dfg, GazDebit};

    vec![
        // White cell count
        GroupSpec::untitled(vec![
            AnalysisSpec::new("Leucocytes", "x10*9/L"),
            AnalysisSpec::new("Polynucléaires neutrophiles", "x10*9/L"),
            AnalysisSpec::new("Lymphocytes", "x10*9/L"),
            AnalysisSpec::new("Polynucléaires éosinophiles", "x10*9/L"),
        ]),
        // Haemoglobin and red cell indices
        GroupSpec::untitled(vec![
            AnalysisSpec::new("Hémoglobine", "g/dL"),
            AnalysisSpec::new("VGM", "fL"),
            AnalysisSpec::new("Hématocrite", "%"),
            AnalysisSpec::new("Réticulocytes", "x10*9/L"),
        ]),
        GroupSpec::untitled(vec![AnalysisSpec::new("Plaquettes", "x10*9/L")]),
        // Ionogram and renal function
        GroupSpec::untitled(vec![
            AnalysisSpec::new("Sodium", "mmol/L"),
            AnalysisSpec::new("Potassium", "mmol/L"),
            AnalysisSpec::new("Bicarbonate", "mmol/L"),
            AnalysisSpec::new("Urée", "mmol/L"),
            AnalysisSpec::new("Créatinine", "µmol/L"),
            AnalysisSpec::new("Créatininémie", "mmol/L"),
            AnalysisSpec::new("DFG calculé par CKD-EPI", "mL/min/1.73m²").with_special(Dfg),
        ]),
        GroupSpec::untitled(vec![
            AnalysisSpec::new("Calcium", "mmol/L"),
            AnalysisSpec::new("Phosphates", "mmol/L"),
            AnalysisSpec::new("Magnésium", "mmol/L"),
        ]),
        // Liver enzymes
        GroupSpec::untitled(vec![
            AnalysisSpec::new("ASAT", "U/L"),
            AnalysisSpec::new("ALAT", "U/L"),
            AnalysisSpec::new("GGT", "U/L"),
            AnalysisSpec::new("Gamma GT", "U/L"),
            AnalysisSpec::new("PAL", "U/L"),
            AnalysisSpec::new("Phosphatases alcalines", "U/L"),
            AnalysisSpec::new("Bilirubine totale", "µmol/L"),
            AnalysisSpec::new("Lipase", "U/L"),
        ]),
        GroupSpec::untitled(vec![
            AnalysisSpec::new("Protéines", "g/L"),
            AnalysisSpec::new("Protéines", "mmol/L"),
        ]),
        // Inflammation
        GroupSpec::untitled(vec![
            AnalysisSpec::new("CRP", "mg/L"),
            AnalysisSpec::new("SAA", "mg/L"),
            AnalysisSpec::new("Protéine sérique amyloide A", "mg/L"),
        ]),
        GroupSpec::untitled(vec![AnalysisSpec::new("BNP", "ng/L")]),
        GroupSpec::untitled(vec![
            AnalysisSpec::new("LDH", "U/L"),
            AnalysisSpec::new("Créatine kinase", "U/L"),
        ]),
        GroupSpec::titled(
            "Gaz du sang sous O2",
            vec![
                AnalysisSpec::new("Débit O2", "L/min").with_special(GazDebit),
                AnalysisSpec::new("pH", ""),
                AnalysisSpec::new("pO2", "mm Hg"),
                AnalysisSpec::new("pCO2", "mm Hg"),
                AnalysisSpec::new("Lactate", "mmol/L"),
            ],
        ),
        GroupSpec::untitled(vec![
            AnalysisSpec::new("HbA1c", "%"),
            AnalysisSpec::new("Hémoglobine A1c", "%"),
        ]),
        GroupSpec::titled(
            "Examens urinaires",
            vec![
                AnalysisSpec::new("Sodium", "mmol/L").with_context(Urine),
                AnalysisSpec::new("Potassium", "mmol/L").with_context(Urine),
                AnalysisSpec::new("Chlorure", "mmol/L").with_context(Urine),
                AnalysisSpec::new("Protéinurie/Créatininurie", "g/mol"),
                AnalysisSpec::new("Protéines/Créatinine", "g/mmol").with_special(ConvertMmolToMol),
            ],
        ),
    ]
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            unit_mapping: default_unit_mapping(),
            name_mapping: default_name_mapping(),
        }
    }
}

impl FormatterConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BloodworkError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| BloodworkError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load config with fallback to the built-in catalog
    pub fn load_with_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|err| {
                tracing::warn!("⚠️  Failed to load config from {}: {err}. Using defaults", p.display());
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
