//! Builder Tests - XMI to canonical model
//!
//! Association canonicalization, cardinality, referees, configuration,
//! and the fatal structural errors.

mod helpers;

use canonical_uml::diagnostics::codes;
use canonical_uml::interchange::Xmi;
use canonical_uml::model::{ElementKind, ElementRef, Referee, Target};
use canonical_uml::{ElementId, InterchangeError, ParserConfig};
use helpers::{agents_model, build, xmi_document};
use rstest::rstest;

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_agents_model_structure() {
    let result = build(helpers::AGENTS_XMI);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let model = result.model;

    assert_eq!(model.id.as_ref().map(ElementId::as_str), Some("ddi4_model"));
    assert_eq!(model.name.as_deref(), Some("DDI4"));
    assert_eq!(
        model.packages.keys().map(ElementId::as_str).collect::<Vec<_>>(),
        vec!["ddi4_core", "ddi4_agents", "ddi4_types"]
    );
    assert_eq!(
        model.classes.keys().map(ElementId::as_str).collect::<Vec<_>>(),
        vec!["Identifiable", "Agent", "Individual", "Organization"]
    );
    assert_eq!(model.enums["AgentRole"].values, vec!["owner", "member"]);
    assert!(model.datatypes.contains_key("Name"));
    assert!(model.datatypes.contains_key("Date"));
    assert_eq!(model.packages["ddi4_core"].comments, vec!["Core classes."]);
    assert!(model.classes["Identifiable"].is_abstract);
}

#[test]
fn test_package_elements_in_document_order() {
    let model = agents_model();
    assert_eq!(
        model.packages["ddi4_core"].elements,
        vec![
            ElementRef::new(ElementKind::Package, "ddi4_agents"),
            ElementRef::new(ElementKind::Package, "ddi4_types"),
        ]
    );
    assert_eq!(
        model.packages["ddi4_types"].elements,
        vec![
            ElementRef::new(ElementKind::Datatype, "Name"),
            ElementRef::new(ElementKind::Enumeration, "AgentRole"),
            ElementRef::new(ElementKind::Datatype, "Date"),
        ]
    );
    assert_eq!(
        model.classes["Individual"].packages,
        vec![ElementId::new("ddi4_agents"), ElementId::new("ddi4_core")]
    );
}

#[test]
fn test_hierarchies() {
    let model = agents_model();
    let mut above: Vec<&str> = model
        .class_hierarchy
        .parents_of("Individual")
        .iter()
        .map(ElementId::as_str)
        .collect();
    above.sort();
    assert_eq!(above, vec!["Agent", "Identifiable"]);
    assert_eq!(model.class_hierarchy.children_of("Identifiable").len(), 3);
    assert_eq!(
        model.package_hierarchy.roots().map(ElementId::as_str).collect::<Vec<_>>(),
        vec!["ddi4_core"]
    );
    assert_eq!(model.classes["Individual"].super_classes, vec![ElementId::new("Agent")]);
}

// ============================================================================
// Association canonicalization
// ============================================================================

#[test]
fn test_unnamed_association_end_takes_association_name() {
    let model = agents_model();
    let individual = &model.classes["Individual"];
    assert_eq!(individual.properties.len(), 1);

    let member = &individual.properties[0];
    assert_eq!(member.name.as_deref(), Some("member"));
    assert_eq!(member.target, Some(Target::Idref("Organization".into())));
    assert_eq!(
        member.comments,
        vec![
            "Organizations the individual belongs to.".to_string(),
            "Membership.".to_string()
        ]
    );
    assert_eq!(
        member.association.as_ref().map(ElementId::as_str),
        Some("Individual-memberOf")
    );
    assert_eq!(
        model.associations["Individual-memberOf"].from.as_ref().map(ElementId::as_str),
        Some("Individual-member")
    );
}

#[test]
fn test_association_with_unknown_end_is_reported() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Association" xmi:id="X" name="x" memberEnd="nowhere X-end">
    <ownedEnd xmi:type="uml:Property" xmi:id="X-end" type="p"/>
  </packagedElement>
</packagedElement>"#,
    );
    let result = build(&doc);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, codes::UNRESOLVED_ASSOCIATION_END);
}

// ============================================================================
// Cardinality
// ============================================================================

#[rstest]
#[case("Identifiable", "id", "1", "1")]
#[case("Identifiable", "basedOn", "0", "*")]
#[case("Individual", "member", "0", "*")]
#[case("Agent", "name", "0", "*")]
fn test_cardinality(
    #[case] class: &str,
    #[case] property: &str,
    #[case] lower: &str,
    #[case] upper: &str,
) {
    let model = agents_model();
    let p = model.classes[class].property(property).unwrap();
    assert_eq!(p.lower, lower);
    assert_eq!(p.upper, upper);
}

#[test]
fn test_href_target_kept_external() {
    let model = agents_model();
    let id = model.classes["Identifiable"].property("id").unwrap();
    assert_eq!(
        id.target,
        Some(Target::Href("http://www.w3.org/2001/XMLSchema#string".into()))
    );
}

// ============================================================================
// Property index and referees
// ============================================================================

#[rstest]
#[case("Identifiable", &[("Identifiable", "basedOn")])]
#[case("Organization", &[("Individual", "member")])]
#[case("Name", &[("Agent", "name")])]
#[case("AgentRole", &[("Agent", "role")])]
#[case("Date", &[("Organization", "founded")])]
#[case("Agent", &[])]
fn test_referees(#[case] target: &str, #[case] expected: &[(&str, &str)]) {
    let model = agents_model();
    let expected: Vec<Referee> = expected
        .iter()
        .map(|(class, prop)| Referee::new(*class, *prop))
        .collect();
    assert_eq!(model.referees(target).unwrap(), expected.as_slice());
}

#[test]
fn test_referee_per_source_class() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="T" name="T"/>
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">
    <ownedAttribute xmi:type="uml:Property" xmi:id="A-t" name="t" type="T"/>
  </packagedElement>
  <packagedElement xmi:type="uml:Class" xmi:id="B" name="B">
    <ownedAttribute xmi:type="uml:Property" xmi:id="B-t" name="t" type="T"/>
    <ownedAttribute xmi:type="uml:Property" xmi:id="B-u" name="u" type="Elsewhere"/>
  </packagedElement>
</packagedElement>"#,
    );
    let model = build(&doc).model;
    assert_eq!(
        model.referees("T").unwrap(),
        &[Referee::new("A", "t"), Referee::new("B", "t")]
    );
    assert_eq!(model.properties["t"].sources.len(), 2);
    assert_eq!(model.properties["t"].uniform_type, vec!["T".to_string()]);
    assert_eq!(model.properties["u"].uniform_type, vec!["Elsewhere".to_string()]);
}

#[test]
fn test_mixed_property_types_reported() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">
    <ownedAttribute xmi:type="uml:Property" xmi:id="A-v" name="value" type="B"/>
  </packagedElement>
  <packagedElement xmi:type="uml:Class" xmi:id="B" name="B">
    <ownedAttribute xmi:type="uml:Property" xmi:id="B-v" name="value" type="A"/>
  </packagedElement>
</packagedElement>"#,
    );
    let result = build(&doc);
    assert!(!result.model.properties["value"].is_uniform());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, codes::MIXED_PROPERTY_TYPES);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_views_parsed_from_view_container() {
    let model = agents_model();
    assert_eq!(model.views.len(), 2);
    assert_eq!(model.view("Agents").unwrap().members, vec![ElementId::new("Individual")]);
    assert_eq!(
        model.view("Organizations").unwrap().members,
        vec![ElementId::new("Organization")]
    );
    assert!(!model.packages.contains_key("ddi4_views"));
}

#[test]
fn test_without_view_pattern_views_are_packages() {
    let model = Xmi::new(ParserConfig::new())
        .read_with_diagnostics(helpers::AGENTS_XMI.as_bytes())
        .unwrap()
        .model;
    assert!(model.views.is_empty());
    assert!(model.packages.contains_key("ddi4_views"));
    assert_eq!(model.imports.len(), 2);
    assert_eq!(
        model.packages["view_agents"].elements,
        vec![ElementRef::new(ElementKind::Import, "view_agents-import")]
    );
}

#[test]
fn test_name_map_and_normalizer() {
    let config = helpers::views_config()
        .with_name("Individual", "Person")
        .with_normalize_type(|href| href.rsplit('#').next().unwrap_or(href).to_string());
    let model = Xmi::new(config)
        .read_with_diagnostics(helpers::AGENTS_XMI.as_bytes())
        .unwrap()
        .model;
    assert_eq!(model.classes["Individual"].name.as_deref(), Some("Person"));
    assert_eq!(
        model.classes["Identifiable"].property("id").unwrap().target,
        Some(Target::Href("string".into()))
    );
}

#[test]
fn test_property_name_case_check() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">
    <ownedAttribute xmi:type="uml:Property" xmi:id="A-x" name="Label" type="A"/>
  </packagedElement>
</packagedElement>"#,
    );
    let quiet = build(&doc);
    assert!(quiet.diagnostics.is_empty());

    let strict = Xmi::new(ParserConfig::new().with_property_name_case_check(true))
        .read_with_diagnostics(doc.as_bytes())
        .unwrap();
    assert_eq!(strict.diagnostics.len(), 1);
    assert_eq!(strict.diagnostics[0].code, codes::PROPERTY_NAME_CASE);
}

#[rstest]
#[case::unnamed(r#"<ownedAttribute xmi:type="uml:Property" xmi:id="A-x" type="A"/>"#, codes::UNNAMED_PROPERTY)]
#[case::untyped(r#"<ownedAttribute xmi:type="uml:Property" xmi:id="A-x" name="x"/>"#, codes::MISSING_PROPERTY_TYPE)]
#[case::aggregation(r#"<ownedAttribute xmi:type="uml:Property" xmi:id="A-x" name="x" type="A" aggregation="partial"/>"#, codes::UNKNOWN_AGGREGATION)]
fn test_property_warnings(#[case] attribute: &str, #[case] code: &str) {
    let doc = xmi_document(&format!(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">{attribute}</packagedElement>
</packagedElement>"#
    ));
    let result = build(&doc);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].code, code);
}

#[test]
fn test_unnamed_property_indexed_and_referenced() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="T" name="T"/>
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">
    <ownedAttribute xmi:type="uml:Property" xmi:id="A-x" type="T"/>
  </packagedElement>
</packagedElement>"#,
    );
    let result = build(&doc);
    assert_eq!(result.diagnostics[0].code, codes::UNNAMED_PROPERTY);

    let model = result.model;
    assert_eq!(model.classes["A"].properties[0].name, None);
    assert_eq!(model.properties["null"].sources.len(), 1);
    assert_eq!(model.referees("T").unwrap(), &[Referee::new("A", "null")]);
}

#[test]
fn test_excluded_subtree_is_skipped() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Package" xmi:id="Pattern_hidden" name="hidden">
    <packagedElement xmi:type="uml:Class" xmi:id="Hidden" name="Hidden"/>
  </packagedElement>
</packagedElement>"#,
    );
    let config = ParserConfig::new().with_exclude_pattern(regex::Regex::new("^Pattern").unwrap());
    let model = Xmi::new(config)
        .read_with_diagnostics(doc.as_bytes())
        .unwrap()
        .model;
    assert!(model.packages.contains_key("Pattern_hidden"));
    assert!(!model.classes.contains_key("Hidden"));
    assert!(model.packages["p"].elements.is_empty());
}

// ============================================================================
// Fatal errors
// ============================================================================

#[rstest]
#[case::duplicate_class(
    r#"<packagedElement xmi:type="uml:Class" xmi:id="A" name="A"/>
       <packagedElement xmi:type="uml:Class" xmi:id="A" name="A"/>"#
)]
#[case::duplicate_enum(
    r#"<packagedElement xmi:type="uml:Enumeration" xmi:id="E" name="E"/>
       <packagedElement xmi:type="uml:Enumeration" xmi:id="E" name="E"/>"#
)]
fn test_duplicate_ids_are_fatal(#[case] body: &str) {
    let doc = xmi_document(&format!(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">{body}</packagedElement>"#
    ));
    let err = Xmi::new(ParserConfig::new())
        .read_with_diagnostics(doc.as_bytes())
        .unwrap_err();
    assert!(matches!(err, InterchangeError::DuplicateId { .. }), "{err}");
}

#[rstest]
#[case("uml:Enumeration")]
#[case("uml:DataType")]
#[case("uml:PrimitiveType")]
fn test_inherited_value_type_is_fatal(#[case] xmi_type: &str) {
    let doc = xmi_document(&format!(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="{xmi_type}" xmi:id="V" name="V">
    <generalization xmi:type="uml:Generalization" xmi:id="V-g" general="Base"/>
  </packagedElement>
</packagedElement>"#
    ));
    let err = Xmi::new(ParserConfig::new())
        .read_with_diagnostics(doc.as_bytes())
        .unwrap_err();
    assert!(matches!(err, InterchangeError::InheritedValueType { .. }), "{err}");
}

#[test]
fn test_generalization_cycle_is_fatal() {
    let doc = xmi_document(
        r#"<packagedElement xmi:type="uml:Package" xmi:id="p" name="p">
  <packagedElement xmi:type="uml:Class" xmi:id="A" name="A">
    <generalization xmi:type="uml:Generalization" xmi:id="A-g" general="B"/>
  </packagedElement>
  <packagedElement xmi:type="uml:Class" xmi:id="B" name="B">
    <generalization xmi:type="uml:Generalization" xmi:id="B-g" general="A"/>
  </packagedElement>
</packagedElement>"#,
    );
    let err = Xmi::new(ParserConfig::new())
        .read_with_diagnostics(doc.as_bytes())
        .unwrap_err();
    assert!(matches!(err, InterchangeError::HierarchyCycle { .. }));
}

// ============================================================================
// File input
// ============================================================================

#[test]
fn test_read_path_records_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.xmi");
    std::fs::write(&path, helpers::AGENTS_XMI).unwrap();

    let result = Xmi::new(helpers::views_config()).read_path(&path).unwrap();
    assert_eq!(
        result.model.source.resource.as_deref(),
        Some(path.display().to_string().as_str())
    );
    assert_eq!(result.model.classes.len(), 4);
}
