use std::collections::BTreeMap;
use std::path::PathBuf;

use topo_sheets::colors::{self, HoldColor};
use topo_sheets::compose::{compose, sanitize_sheet_name, sheet_specs};
use topo_sheets::model::{FieldMap, RawRecord, RawRecordTable, TopoSheet, TopoWorkbook};
use topo_sheets::transform::{clean_sector, resolve, transform};
use topo_sheets::{Result, ToolError, TopoConfig};

fn record(values: &[(&str, &str)], hold_colors: &str) -> RawRecord {
    let fields: BTreeMap<String, String> = values
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .chain([("hold_colors".to_string(), hold_colors.to_string())])
        .collect();
    RawRecord {
        fields,
        hold_colors: hold_colors.to_string(),
    }
}

fn route(sector: &str, grade: &str, hold_colors: &str) -> RawRecord {
    record(&[("sector", sector), ("grade", grade)], hold_colors)
}

fn table(records: Vec<RawRecord>) -> RawRecordTable {
    RawRecordTable {
        source: PathBuf::from("routes.tsv"),
        records,
    }
}

fn config(fields: &[(&str, &str)], ordering_keys: &[&str]) -> TopoConfig {
    TopoConfig {
        field_map: fields.iter().copied().collect(),
        ordering_keys: ordering_keys.iter().map(|key| key.to_string()).collect(),
        ..TopoConfig::default()
    }
}

fn grade_config(ordering_keys: &[&str]) -> TopoConfig {
    config(&[("sector", "Relais"), ("grade", "Cotation")], ordering_keys)
}

fn compose_routes(raw: &RawRecordTable, config: &TopoConfig) -> Result<TopoWorkbook> {
    compose(&transform(raw, config), config)
}

fn first_column(sheet: &TopoSheet) -> Vec<&str> {
    sheet.rows.iter().map(|row| row[0].as_str()).collect()
}

#[test]
fn resolve_falls_back_to_field_name() {
    let map: FieldMap = [("grade", "Cotation")].into_iter().collect();

    assert_eq!(resolve("grade", &map), "Cotation");
    assert_eq!(resolve("setter", &map), "setter");
    assert_eq!(resolve("", &map), "");
}

#[test]
fn field_map_keeps_json_document_order() {
    let source = r#"{"name": "Nom", "grade": "Cotation", "sector": "Relais"}"#;

    let map: FieldMap = serde_json::from_str(source).expect("field map parsed");

    let fields: Vec<&str> = map.fields().collect();
    assert_eq!(fields, vec!["name", "grade", "sector"]);
}

#[test]
fn sector_prefix_is_stripped_once() {
    assert_eq!(clean_sector("Ligne 12"), "12");
    assert_eq!(clean_sector("Secteur A"), "Secteur A");
    assert_eq!(clean_sector("Ligne Ligne 4"), "Ligne 4");
    assert_eq!(clean_sector("Ligne12"), "Ligne12");
    assert_eq!(clean_sector("ligne 3"), "ligne 3");
}

#[test]
fn decode_follows_token_rules() {
    let single = colors::decode("#ff0000", "#FFFFFF");
    assert_eq!(single.primary, "#ff0000");
    assert_eq!(single.secondary, None);

    let pair = colors::decode("#ff0000, #00ff00", "#FFFFFF");
    assert_eq!(pair.primary, "#ff0000");
    assert_eq!(pair.secondary.as_deref(), Some("#00ff00"));

    let empty = colors::decode("", "#FFFFFF");
    assert_eq!(empty.primary, "#FFFFFF");
    assert_eq!(empty.secondary, None);

    let triple = colors::decode("#ff0000,#00ff00,#0000ff", "#FFFFFF");
    assert_eq!(triple.secondary.as_deref(), Some("#00ff00"));
}

#[test]
fn empty_second_token_is_present_but_draws_no_diagonal() {
    let spec = colors::decode("#111111,", "#FFFFFF");
    assert_eq!(spec.secondary.as_deref(), Some(""));
    assert_eq!(spec.diagonal(), None);

    let (background, diagonal) = colors::resolve(&spec, 1).expect("colors resolved");
    assert_eq!(background.to_string(), "#111111");
    assert_eq!(diagonal, None);
}

#[test]
fn blank_primary_with_secondary_uses_default_background() {
    let spec = colors::decode(" , blue", "#EEEEEE");
    assert_eq!(spec.primary, "#EEEEEE");
    assert_eq!(spec.diagonal(), Some("blue"));
}

#[test]
fn hold_color_parses_hex_and_names() {
    let rgb = |token: &str| HoldColor::parse(token).map(HoldColor::rgb);

    assert_eq!(rgb("#00ff00"), Some(0x00FF00));
    assert_eq!(rgb("A0B0C0"), Some(0xA0B0C0));
    assert_eq!(rgb("Red"), Some(0xFF0000));
    assert_eq!(rgb("#12345"), None);
    assert_eq!(rgb("rouge"), None);
}

#[test]
fn transform_puts_sector_first_and_drops_unmapped_fields() {
    let first = [
        ("grade", "6a"),
        ("sector", "Ligne 3"),
        ("name", "Arête"),
        ("extra", "x"),
    ];
    let second = [("grade", "5c"), ("sector", "Secteur A"), ("name", "Dalle")];
    let raw = table(vec![record(&first, "#111111"), record(&second, "#222222")]);
    let config = config(
        &[("grade", "Cotation"), ("name", "Nom"), ("sector", "Relais")],
        &["grade"],
    );

    let display = transform(&raw, &config);

    assert_eq!(display.labels(), vec!["Relais", "Cotation", "Nom"]);
    assert_eq!(display.len(), raw.len());
    assert_eq!(display.rows[0].cells, vec!["3", "6a", "Arête"]);
    assert_eq!(display.rows[1].cells, vec!["Secteur A", "5c", "Dalle"]);
    assert_eq!(display.rows[1].source_row, 2);
}

#[test]
fn sorted_sheet_keeps_labels_and_colors_together() {
    let raw = table(vec![
        route("Ligne 1", "6b", "#000001"),
        route("Ligne 2", "5a", "#000002,#0000F2"),
        route("Ligne 3", "7a", "#000003"),
        route("Ligne 4", "5a", "#000004"),
    ]);
    let config = grade_config(&["grade"]);

    let display = transform(&raw, &config);
    let workbook = compose(&display, &config).expect("workbook composed");
    let sheet = &workbook.sheets[0];

    assert_eq!(first_column(sheet), vec!["2", "4", "1", "3"]);

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let expected = format!("#00000{}", row[0]);
        let style = sheet.style_at(row_idx, 0).expect("label cell styled");
        assert_eq!(style.background.to_string(), expected);
    }
    let split = sheet.style_at(0, 0).expect("first row styled");
    let diagonal = split.diagonal.map(|color| color.to_string());
    assert_eq!(diagonal.as_deref(), Some("#0000F2"));
    assert_eq!(sheet.style_at(1, 0).and_then(|style| style.diagonal), None);
}

#[test]
fn compose_produces_one_sheet_per_key_in_order() {
    let raw = table(vec![
        route("Ligne 2", "6a", "red"),
        route("Ligne 1", "7a", "blue"),
    ]);
    let config = grade_config(&["grade", "sector"]);

    let workbook = compose_routes(&raw, &config).expect("workbook composed");

    let titles: Vec<&str> = workbook
        .sheets
        .iter()
        .map(|sheet| sheet.spec.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Par Cotation", "Par Relais"]);
    assert_eq!(workbook.sheets[0].rows[0][0], "2");
    assert_eq!(workbook.sheets[1].rows[0][0], "1");
    assert_eq!(workbook.sheets[0].columns, vec!["Relais", "Cotation"]);
}

#[test]
fn ties_keep_source_order() {
    let raw = table(vec![
        route("B", "6a", ""),
        route("A", "6a", ""),
        route("C", "5a", ""),
    ]);
    let config = grade_config(&["grade"]);

    let workbook = compose_routes(&raw, &config).expect("workbook composed");

    assert_eq!(first_column(&workbook.sheets[0]), vec!["C", "B", "A"]);
}

#[test]
fn no_ordering_key_yields_single_unsorted_sheet() {
    let raw = table(vec![
        record(&[("sector", "9")], ""),
        record(&[("sector", "1")], ""),
    ]);
    let config = config(&[("sector", "Relais")], &[]);

    let workbook = compose_routes(&raw, &config).expect("workbook composed");

    assert_eq!(workbook.sheets.len(), 1);
    let sheet = &workbook.sheets[0];
    assert_eq!(sheet.spec.key, None);
    assert_eq!(sheet.spec.title, "Topo");
    assert_eq!(sheet.rows, vec![vec!["9"], vec!["1"]]);
    let style = sheet.style_at(0, 0).expect("default color applied");
    assert_eq!(style.background.to_string(), "#FFFFFF");
}

#[test]
fn unknown_color_token_aborts_with_row_number() {
    let raw = table(vec![
        record(&[("sector", "1")], "#111111"),
        record(&[("sector", "2")], "#222222, chartreuse"),
    ]);
    let config = config(&[("sector", "Relais")], &["sector"]);

    let error = compose_routes(&raw, &config).expect_err("invalid color");

    match error {
        ToolError::InvalidEncoding { row, token } => {
            assert_eq!(row, 2);
            assert_eq!(token, "chartreuse");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn color_targets_paint_every_listed_column() {
    let raw = table(vec![record(&[("sector", "1"), ("name", "Dalle")], "#123456")]);
    let config = TopoConfig {
        color_targets: vec!["sector".to_string(), "name".to_string()],
        ..config(&[("sector", "Relais"), ("name", "Nom")], &["sector"])
    };

    let workbook = compose_routes(&raw, &config).expect("workbook composed");

    let sheet = &workbook.sheets[0];
    assert_eq!(sheet.styles.len(), 2);
    assert!(sheet.style_at(0, 1).is_some());
}

#[test]
fn duplicate_and_illegal_titles_are_made_valid() {
    let config = TopoConfig {
        sheet_prefix: "Tri: ".to_string(),
        ..config(
            &[("sector", "Relais/Ligne"), ("grade", "Relais/Ligne")],
            &["sector", "grade"],
        )
    };

    let specs = sheet_specs(&config);

    assert_eq!(specs[0].title, "Tri_ Relais_Ligne");
    assert_eq!(specs[1].title, "Tri_ Relais_Ligne_1");
    assert_eq!(specs[1].label, "Relais/Ligne");
    assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), 31);
    assert_eq!(sanitize_sheet_name("  "), "Sheet");
}

#[test]
fn truncated_title_never_ends_with_apostrophe() {
    let label = format!("{}'yy", "x".repeat(30));
    let fields = [("sector", label.as_str()), ("grade", label.as_str())];
    let config = TopoConfig {
        sheet_prefix: String::new(),
        ..config(&fields, &["sector", "grade"])
    };

    let specs = sheet_specs(&config);

    assert_eq!(sanitize_sheet_name(&label), "x".repeat(30));
    assert_eq!(specs[0].title, "x".repeat(30));
    assert_eq!(specs[1].title, format!("{}_1", "x".repeat(29)));
    assert_eq!(sanitize_sheet_name("' quoted '"), "quoted");
    assert_eq!(sanitize_sheet_name("' '"), "Sheet");
}

#[test]
fn compose_is_deterministic() {
    let raw = table(vec![
        route("Ligne 5", "6c", "#010101,#020202"),
        route("Ligne 4", "6c", "#030303"),
    ]);
    let config = grade_config(&["sector", "grade"]);

    let first = compose_routes(&raw, &config).expect("first run");
    let second = compose_routes(&raw, &config).expect("second run");

    assert_eq!(first, second);
}

#[test]
fn config_validation_rejects_inconsistent_settings() {
    let bad_color = TopoConfig {
        default_color: "not-a-color".to_string(),
        ..TopoConfig::default()
    };
    let error = bad_color.validate();
    assert!(matches!(error, Err(ToolError::InvalidConfig(_))));

    let bad_target = TopoConfig {
        color_targets: vec!["hold_colors".to_string()],
        ..TopoConfig::default()
    };
    let error = bad_target.validate();
    assert!(matches!(error, Err(ToolError::InvalidConfig(_))));

    assert!(TopoConfig::default().validate().is_ok());
}

#[test]
fn schema_lists_each_required_column_once() {
    let config = config(
        &[("grade", "Cotation"), ("sector", "Relais")],
        &["grade", "setter"],
    );

    let schema = config.schema();

    assert_eq!(schema.display_fields, vec!["sector", "grade"]);
    let required = ["sector", "grade", "setter", "hold_colors"];
    assert_eq!(schema.required_columns, required);
}
