//! Shared XMI fixtures and model builders for integration tests.

#![allow(dead_code)]

use canonical_uml::interchange::Xmi;
use canonical_uml::model::{Class, ElementKind, ElementRef, Package, PropertyRecord, Target};
use canonical_uml::{BuildResult, Model, ParserConfig};
use regex::Regex;

/// A small agents model with generalizations, an association, value
/// types, and a view container.
///
/// ```text
/// ddi4_core
/// ├── ddi4_agents   Identifiable ◁─ Agent ◁─ Individual, Organization
/// │                 Individual ──member──▶ Organization (association)
/// └── ddi4_types    Name, AgentRole, Date
/// ddi4_views        Agents = [Individual], Organizations = [Organization]
/// ```
pub const AGENTS_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
         xmlns:uml="http://www.omg.org/spec/UML/20131001">
  <uml:Model xmi:type="uml:Model" xmi:id="ddi4_model" name="DDI4">
    <packagedElement xmi:type="uml:Package" xmi:id="ddi4_core" name="Core">
      <ownedComment xmi:type="uml:Comment" xmi:id="ddi4_core-comment" body="Core classes."/>
      <packagedElement xmi:type="uml:Package" xmi:id="ddi4_agents" name="Agents">
        <packagedElement xmi:type="uml:Class" xmi:id="Identifiable" name="Identifiable" isAbstract="true">
          <ownedAttribute xmi:type="uml:Property" xmi:id="Identifiable-id" name="id">
            <type href="http://www.w3.org/2001/XMLSchema#string"/>
            <lowerValue xmi:type="uml:LiteralInteger" xmi:id="Identifiable-id-lower" value="1"/>
            <upperValue xmi:type="uml:LiteralUnlimitedNatural" xmi:id="Identifiable-id-upper" value="1"/>
          </ownedAttribute>
          <ownedAttribute xmi:type="uml:Property" xmi:id="Identifiable-basedOn" name="basedOn" type="Identifiable">
            <lowerValue xmi:type="uml:LiteralInteger" xmi:id="Identifiable-basedOn-lower" value="0"/>
            <upperValue xmi:type="uml:LiteralUnlimitedNatural" xmi:id="Identifiable-basedOn-upper" value="-1"/>
          </ownedAttribute>
        </packagedElement>
        <packagedElement xmi:type="uml:Class" xmi:id="Agent" name="Agent" isAbstract="true">
          <generalization xmi:type="uml:Generalization" xmi:id="Agent-generalization" general="Identifiable"/>
          <ownedAttribute xmi:type="uml:Property" xmi:id="Agent-name" name="name" type="Name"/>
          <ownedAttribute xmi:type="uml:Property" xmi:id="Agent-role" name="role" type="AgentRole"/>
        </packagedElement>
        <packagedElement xmi:type="uml:Class" xmi:id="Individual" name="Individual">
          <generalization xmi:type="uml:Generalization" xmi:id="Individual-generalization">
            <general xmi:idref="Agent"/>
          </generalization>
          <ownedAttribute xmi:type="uml:Property" xmi:id="Individual-member" type="Organization" association="Individual-memberOf">
            <ownedComment xmi:type="uml:Comment" xmi:id="Individual-member-comment">
              <body>Organizations the individual belongs to.</body>
            </ownedComment>
            <lowerValue xmi:type="uml:LiteralInteger" xmi:id="Individual-member-lower" value="0"/>
            <upperValue xmi:type="uml:LiteralUnlimitedNatural" xmi:id="Individual-member-upper" value="-1"/>
          </ownedAttribute>
        </packagedElement>
        <packagedElement xmi:type="uml:Class" xmi:id="Organization" name="Organization">
          <generalization xmi:type="uml:Generalization" xmi:id="Organization-generalization" general="Agent"/>
          <ownedAttribute xmi:type="uml:Property" xmi:id="Organization-founded" name="founded" type="Date"/>
        </packagedElement>
        <packagedElement xmi:type="uml:Association" xmi:id="Individual-memberOf" name="member" memberEnd="Individual-member Individual-memberOf-source">
          <ownedComment xmi:type="uml:Comment" xmi:id="Individual-memberOf-comment" body="Membership."/>
          <ownedEnd xmi:type="uml:Property" xmi:id="Individual-memberOf-source" type="Individual" association="Individual-memberOf"/>
        </packagedElement>
      </packagedElement>
      <packagedElement xmi:type="uml:Package" xmi:id="ddi4_types" name="Types">
        <packagedElement xmi:type="uml:DataType" xmi:id="Name" name="Name"/>
        <packagedElement xmi:type="uml:Enumeration" xmi:id="AgentRole" name="AgentRole">
          <ownedLiteral xmi:type="uml:EnumerationLiteral" xmi:id="AgentRole-owner" name="owner"/>
          <ownedLiteral xmi:type="uml:EnumerationLiteral" xmi:id="AgentRole-member" name="member"/>
        </packagedElement>
        <packagedElement xmi:type="uml:PrimitiveType" xmi:id="Date" name="Date"/>
      </packagedElement>
    </packagedElement>
    <packagedElement xmi:type="uml:Package" xmi:id="ddi4_views" name="Views">
      <packagedElement xmi:type="uml:Package" xmi:id="view_agents" name="Agents">
        <elementImport xmi:type="uml:ElementImport" xmi:id="view_agents-import">
          <importedElement xmi:idref="Individual"/>
        </elementImport>
      </packagedElement>
      <packagedElement xmi:type="uml:Package" xmi:id="view_organizations" name="Organizations">
        <elementImport xmi:type="uml:ElementImport" xmi:id="view_organizations-import" importedElement="Organization"/>
      </packagedElement>
    </packagedElement>
  </uml:Model>
</xmi:XMI>
"#;

/// Configuration that treats `*_views` packages as view containers.
pub fn views_config() -> ParserConfig {
    ParserConfig::new().with_view_pattern(Regex::new("_views$").unwrap())
}

/// Build `input` with the view configuration, panicking on failure.
pub fn build(input: &str) -> BuildResult {
    Xmi::new(views_config())
        .read_with_diagnostics(input.as_bytes())
        .unwrap_or_else(|e| panic!("build failed: {e}"))
}

/// The compiled agents model.
pub fn agents_model() -> Model {
    build(AGENTS_XMI).model
}

/// Wrap `body` (packaged elements) in a minimal XMI document.
pub fn xmi_document(body: &str) -> String {
    format!(
        r#"<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001" xmlns:uml="http://www.omg.org/spec/UML/20131001">
  <uml:Model xmi:type="uml:Model" xmi:id="model" name="Test">
{body}
  </uml:Model>
</xmi:XMI>"#
    )
}

/// A property typed by an internal id.
pub fn property(class: &str, index: usize, name: &str, target: &str) -> PropertyRecord {
    PropertyRecord::new(
        format!("{class}-{index}"),
        class,
        Some(name.to_string()),
        Some(Target::Idref(target.into())),
        "0",
        "1",
    )
}

/// A canonical model with one package listing `listed` and the classes
/// `classes` (id, properties as (name, target)).
pub fn package_model(listed: &[&str], classes: &[(&str, &[(&str, &str)])]) -> Model {
    let mut model = Model::new();
    let mut package = Package::new("p", Some("P".to_string()), Vec::new());
    package.elements = listed
        .iter()
        .map(|id| ElementRef::new(ElementKind::Class, *id))
        .collect();
    model.add_package(package).unwrap();
    model.package_hierarchy.insert("p");

    for (id, props) in classes {
        let mut class = Class::new(*id, Some(id.to_string()));
        class.packages = vec!["p".into()];
        class.properties = props
            .iter()
            .enumerate()
            .map(|(i, (name, target))| property(id, i, name, target))
            .collect();
        model.add_class(class).unwrap();
    }
    canonical_uml::model::index_properties(&mut model);
    canonical_uml::model::update_referees(&mut model);
    model
}
