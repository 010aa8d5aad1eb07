// src/process/normalize.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, AsArray, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::{borrow::Cow, collections::HashSet, sync::Arc};

use super::columns::{APPLICATION, RAW_APPLICATION};

/// Acronyms forced back to upper case after title-casing.
pub const ACRONYMS: &[&str] = &[
    "RF", "RFI", "EMC", "EMI", "ESD", "UV", "DVD", "IC", "ID", "PC", "PCB", "LED", "LCD", "TC",
    "LRO",
];

/// Whole-value corrections applied last, on the fully cleaned string.
pub const CORRECTIONS: &[(&str, &str)] = &[
    ("2 Side Tape", "Tape, Double-Sided"),
    ("2 Sided Tape", "Tape, Double-Sided"),
    ("Tape 2 Side", "Tape, Double-Sided"),
    ("Tape 2 Sided", "Tape, Double-Sided"),
    ("Capicator", "Capacitor"),
    ("Electrical Comp", "Electrical Component"),
    ("Electrical Components", "Electrical Component"),
    ("PC Board", "PCB"),
];

/// A single regex substitution, replacing every match with a literal.
pub struct Rule {
    pub label: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(label: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).expect("normalizer pattern should parse"),
            replacement,
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, NoExpand(self.replacement))
    }
}

/// Substitutions between title-casing and the final trim, in application order.
///
/// Compound terms accept periods, whitespace and a single hyphen between their
/// parts, so text that loses its periods still matches on a second pass.
/// Commas and slashes separate list items and never join them.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules: Vec<Rule> = ACRONYMS
        .iter()
        .map(|&acronym| Rule::new(acronym, &format!(r"(?i)\b{}\b", acronym), acronym))
        .collect();

    rules.extend([
        Rule::new("ampersand", "&", " and "),
        Rule::new("Adhesive", r"(?i)\bAdh\b", "Adhesive"),
        Rule::new("Tape", r"(?i)\bTpe\b", "Tape"),
        Rule::new("Antistatic", r"(?i)\bAnti[.\s]*-?[.\s]*static\b", "Antistatic"),
        Rule::new("Conformal", r"(?i)\bConf\b", "Conformal"),
        Rule::new("Conductive", r"(?i)\bCond\b", "Conductive"),
        Rule::new("Compound", r"(?i)\b(?:Cpnd|Cmpd)\b", "Compound"),
        Rule::new("Electrical", r"(?i)\bElec\b", "Electrical"),
        Rule::new(
            "Electrically-Conductive",
            r"(?i)\belectrical[.\s]*-?[.\s]*conductive\b",
            "Electrically-Conductive",
        ),
        Rule::new("Black", r"(?i)\bBlk\b", "Black"),
        Rule::new("Unknown", r"(?i)\bUnk\b", "Unknown"),
        Rule::new("Vibration", r"(?i)\bVib\b", "Vibration"),
        Rule::new("Optical", r"(?i)\bOpt\b", "Optical"),
        Rule::new("Thermal", r"(?i)\b(?:Ther|Therm|Therma)\b", "Thermal"),
        Rule::new(
            "Thermally-Conductive",
            r"(?i)\btherm\w*?[.\s]*-?[.\s]*conductive\b",
            "Thermally-Conductive",
        ),
        Rule::new("Lubricant", r"(?i)\bLube\b", "Lubricant"),
        Rule::new("Material", r"(?i)\b(?:Matl|Mtl)s?\.?\b", "Material"),
        Rule::new("Materials", r"(?i)\bMaerials\b", "Materials"),
        Rule::new("Coating", r"(?i)\bCoatint\b", "Coating"),
        Rule::new("Wrapping", r"(?i)\bWrap+i[nm]g\b", "Wrapping"),
        Rule::new("whitespace", r"\s+", " "),
        Rule::new("3D", r"3[.\s]*-?[.\s]*[Dd]", "3D"),
        Rule::new("O-Ring", r"(?i)\b[0O][.\s]*-?[.\s]*ring\b", "O-Ring"),
        Rule::new("and", r"(?i)\band\b", "and"),
        Rule::new("for", r"(?i)\bfor\b", "for"),
        Rule::new("periods", r"\.", ""),
        Rule::new("whitespace", r"\s+", " "),
    ]);
    rules
});

/// Upper-case every character that starts the string or follows a
/// non-alphanumeric character; lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut upper_next = true;
    for c in text.chars() {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = !c.is_alphanumeric();
    }
    out
}

/// Look `value` up in [`CORRECTIONS`], falling back to the value itself.
pub fn correct(value: &str) -> &str {
    CORRECTIONS
        .iter()
        .find(|(from, _)| *from == value)
        .map_or(value, |(_, to)| *to)
}

/// Normalize an already title-cased application string.
fn normalize_titled(titled: &str) -> String {
    let mut value = titled.to_string();
    for rule in RULES.iter() {
        value = rule.apply(&value).into_owned();
    }
    correct(value.trim()).to_string()
}

/// Full normalization of one raw `Application` value.
pub fn normalize(raw: &str) -> String {
    normalize_titled(&title_case(raw))
}

/// `(title-cased raw value, normalized value)` for one application.
pub fn normalize_with_raw(raw: &str) -> (String, String) {
    let titled = title_case(raw);
    let normalized = normalize_titled(&titled);
    (titled, normalized)
}

/// Distinct values of `column`, counting null as one value.
pub fn unique_count(batch: &RecordBatch, column: &str) -> Result<usize> {
    let values = string_column(batch, column)?;
    Ok(values.iter().collect::<HashSet<_>>().len())
}

/// Replace `Application` with its normalized form and append the
/// title-cased original as `Raw_Application`. Nulls stay null in both.
pub fn normalize_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let idx = schema
        .index_of(APPLICATION)
        .with_context(|| format!("column {} missing", APPLICATION))?;
    let applications = string_column(batch, APPLICATION)?;

    let (raw, normalized): (Vec<Option<String>>, Vec<Option<String>>) = applications
        .iter()
        .map(|value| match value {
            Some(v) => {
                let (raw, normalized) = normalize_with_raw(v);
                (Some(raw), Some(normalized))
            }
            None => (None, None),
        })
        .unzip();

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns[idx] = Arc::new(StringArray::from(normalized));
    fields.push(Field::new(RAW_APPLICATION, DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(raw)));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column {} missing", name))?
        .as_string_opt::<i32>()
        .with_context(|| format!("column {} is not text", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "2 SIDE TAPE",
        "tape 2 sided",
        "Thermal Cond Matl",
        "therm. cond. adh.",
        "THERMAL  CONDUCTIVE ADHESIVE",
        "PC Board",
        "pcb conformal coatint",
        "ELEC CONDUCTIVE ADH",
        "Electrical Comps.",
        "electrical components",
        "Anti-Static Bag & Wrapping",
        "anti static wraping material",
        "O-ring, Vacuum",
        "0 ring lube",
        "3-d printing matls.",
        "Pot. Cmpd for ESD / EMI shielding",
        "BLK Opt. Tpe",
        "unk",
        "Vib Damper And Isolator",
        "led, lcd & uv cure adhesive",
        "Capicator",
        "Maerials for LRO",
        "Class 3, Dow Sealant",
        "Thermal, Conductive Adhesive",
        "Anti / Static Bag",
        "   ",
    ];

    #[test]
    fn title_case_follows_non_alphanumerics() {
        assert_eq!(title_case("o-ring FOR uhv"), "O-Ring For Uhv");
        assert_eq!(title_case("3d ADH."), "3d Adh.");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn residual_corrections() {
        assert_eq!(normalize("2 SIDE TAPE"), "Tape, Double-Sided");
        assert_eq!(normalize("tape 2 sided"), "Tape, Double-Sided");
        assert_eq!(normalize("PC Board"), "PCB");
        assert_eq!(normalize("Capicator"), "Capacitor");
        assert_eq!(normalize("electrical components"), "Electrical Component");
        assert_eq!(normalize("Elec Comp"), "Electrical Component");
    }

    #[test]
    fn abbreviations_expand_into_compounds() {
        assert_eq!(normalize("Thermal Cond Matl"), "Thermally-Conductive Material");
        assert_eq!(normalize("therm. cond. adh."), "Thermally-Conductive Adhesive");
        assert_eq!(normalize("ELEC CONDUCTIVE ADH"), "Electrically-Conductive Adhesive");
        assert_eq!(normalize("BLK Opt. Tpe"), "Black Optical Tape");
        assert_eq!(normalize("unk"), "Unknown");
        assert_eq!(normalize("pcb conformal coatint"), "PCB Conformal Coating");
    }

    #[test]
    fn spelling_variants() {
        assert_eq!(normalize("Anti-Static Bag & Wrapping"), "Antistatic Bag and Wrapping");
        assert_eq!(normalize("anti static wraping material"), "Antistatic Wrapping Material");
        assert_eq!(normalize("O-ring, Vacuum"), "O-Ring, Vacuum");
        assert_eq!(normalize("0 ring lube"), "O-Ring Lubricant");
        assert_eq!(normalize("3-d printing matls."), "3D Printing Material");
        assert_eq!(normalize("Maerials for LRO"), "Materials for LRO");
    }

    #[test]
    fn conjunctions_and_acronyms() {
        assert_eq!(normalize("Vib Damper And Isolator"), "Vibration Damper and Isolator");
        assert_eq!(normalize("led, lcd & uv cure adhesive"), "LED, LCD and UV Cure Adhesive");
        assert_eq!(
            normalize("Pot. Cmpd for ESD / EMI shielding"),
            "Pot Compound for ESD / EMI Shielding"
        );
    }

    #[test]
    fn list_separators_keep_terms_apart() {
        assert_eq!(normalize("Class 3, Dow Sealant"), "Class 3, Dow Sealant");
        assert_eq!(normalize("Type 3 / Dielectric"), "Type 3 / Dielectric");
        assert_eq!(normalize("Thermal, Conductive Adhesive"), "Thermal, Conductive Adhesive");
        assert_eq!(normalize("Electrical, Conductive Tape"), "Electrical, Conductive Tape");
        assert_eq!(normalize("Anti / Static Bag"), "Anti / Static Bag");
        assert_eq!(normalize("O, Ring Seal"), "O, Ring Seal");
    }

    #[test]
    fn dotted_and_hyphenated_compounds_still_join() {
        assert_eq!(normalize("Thermal. - Conductive Grease"), "Thermally-Conductive Grease");
        assert_eq!(normalize("anti.static foam"), "Antistatic Foam");
        assert_eq!(normalize("3 . d print"), "3D Print");
        assert_eq!(normalize("o - ring"), "O-Ring");
    }

    #[test]
    fn glued_periods_fuse_words() {
        // the period marks a title-case boundary, then is removed
        let once = normalize("Adh.Tape");
        assert_eq!(once, "AdhesiveTape");
        assert_eq!(normalize(&once), "Adhesivetape");
    }

    #[test]
    fn whitespace_only_collapses_to_empty() {
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(" Foam   &  Tape "), "Foam and Tape");
    }

    #[test]
    fn normalization_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input {:?}", sample);
        }
    }

    #[test]
    fn rule_order_is_fixed() {
        let labels: Vec<&str> = RULES.iter().map(|r| r.label).collect();
        let position = |label: &str| labels.iter().position(|l| *l == label).unwrap();

        assert_eq!(&labels[..ACRONYMS.len()], ACRONYMS);
        assert!(position("ampersand") < position("Adhesive"));
        assert!(position("Conductive") < position("Electrically-Conductive"));
        assert!(position("Thermal") < position("Thermally-Conductive"));
        assert!(position("Material") < position("periods"));
        assert!(position("and") < position("periods"));
        assert_eq!(labels.iter().filter(|l| **l == "whitespace").count(), 2);
        assert_eq!(labels.last(), Some(&"whitespace"));
        assert_eq!(labels[labels.len() - 2], "periods");
    }

    #[test]
    fn single_rules_in_isolation() {
        let rule = |label: &str| RULES.iter().find(|r| r.label == label).unwrap();
        assert_eq!(rule("Adhesive").apply("Adh, Adhesion"), "Adhesive, Adhesion");
        assert_eq!(rule("Material").apply("Mtls Matl."), "Material Material.");
        assert_eq!(rule("periods").apply("a.b.c."), "abc");
        assert_eq!(rule("O-Ring").apply("O Ring"), "O-Ring");
        assert_eq!(rule("PC").apply("Pc Pcb"), "PC Pcb");
    }

    #[test]
    fn batch_keeps_raw_and_nulls() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new(APPLICATION, DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec![Some("2 SIDE TAPE"), None, Some("2 side tape")]))],
        )?;
        assert_eq!(unique_count(&batch, APPLICATION)?, 3);

        let out = normalize_batch(&batch)?;
        assert_eq!(unique_count(&out, APPLICATION)?, 2);

        let app: Vec<_> = string_column(&out, APPLICATION)?.iter().collect();
        assert_eq!(app, vec![Some("Tape, Double-Sided"), None, Some("Tape, Double-Sided")]);
        let raw: Vec<_> = string_column(&out, RAW_APPLICATION)?.iter().collect();
        assert_eq!(raw, vec![Some("2 Side Tape"), None, Some("2 Side Tape")]);
        Ok(())
    }
}
