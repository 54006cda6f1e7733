//! Domain constants for XMI ingestion and the canonical wire form.

/// Sentinel stored in `upper` for an unbounded multiplicity.
pub const UPPER_UNLIMITED: &str = "*";

/// Wire value some exporters use for an unbounded upper multiplicity.
pub const WIRE_UNLIMITED: &str = "-1";

/// Property-index key for attributes declared without a name.
pub const UNNAMED_PROPERTY_KEY: &str = "null";

/// Default lower bound when a property carries no `lowerValue`.
pub const DEFAULT_LOWER: &str = "0";

/// XMI identity attribute.
pub const XMI_ID: &str = "xmi:id";

/// XMI reference attribute.
pub const XMI_IDREF: &str = "xmi:idref";

/// XMI type discriminator attribute.
pub const XMI_TYPE: &str = "xmi:type";

/// Root wrapper element of an XMI document.
pub const XMI_ROOT: &str = "xmi:XMI";

/// Model element directly below the XMI wrapper.
pub const UML_MODEL: &str = "uml:Model";
