//! Structured output schema for job classification
//!
//! [`JobEnrichment`] is both the deserialization target for classifier
//! responses and the source of the JSON schema sent with every request. The
//! field doc comments become schema descriptions, so they are written as
//! instructions to the model.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound accepted for `MinYearsExperience`
pub const MAX_YEARS_EXPERIENCE: u32 = 25;

/// Structured fields the classifier fills in for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct JobEnrichment {
    /// A concise summary of the job role and key responsibilities
    pub parsed_description: String,

    /// Deadline or expiry date for the job posting. Use 'Ongoing until requisition is closed' if not specified
    pub deadline_date: String,

    pub min_degree: Degree,

    /// Minimum years of professional experience required. If the title contains 'Senior' or 'Sr.'
    /// use at least 4. If it contains 'Principal', 'Staff', 'Lead' or 'Director' use at least 7.
    /// If it contains 'Mid-level' use at least 2. Otherwise take the years stated in the
    /// description, or 0 when none are stated.
    #[schemars(range(min = 0, max = 25))]
    pub min_years_experience: u32,

    /// Work arrangement. Default to 'In-Office' if unclear
    pub modality: Modality,

    /// Technical domain. If the description focuses on server-side or microservices development, choose 'Backend'
    pub domain: TechDomain,

    /// Programming languages mentioned in the job. Only programming languages, not spoken languages like English or Spanish
    pub languages: Vec<String>,

    /// Software tools, frameworks, databases, and technologies mentioned in the job
    pub technologies: Vec<String>,

    /// Whether the job is primarily software engineering. True only for roles that mainly involve
    /// coding or deep technical system design (Software Engineer, Developer, Data Scientist,
    /// ML Engineer, DevOps Engineer, SRE, QA Engineer). False for Project Manager, Product Manager,
    /// Designer, Sales Engineer, IT Support and similar.
    pub is_software_engineer_related: bool,
}

impl JobEnrichment {
    /// Checks constraints serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.min_years_experience > MAX_YEARS_EXPERIENCE {
            return Err(format!(
                "MinYearsExperience {} exceeds {}",
                self.min_years_experience, MAX_YEARS_EXPERIENCE
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Degree {
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "Ph.D")]
    PhD,
    Unspecified,
}

impl Degree {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bachelors => "Bachelor's",
            Self::Masters => "Master's",
            Self::PhD => "Ph.D",
            Self::Unspecified => "Unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Modality {
    Remote,
    Hybrid,
    #[serde(rename = "In-Office")]
    InOffice,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::InOffice => "In-Office",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TechDomain {
    Backend,
    #[serde(rename = "Full-Stack")]
    FullStack,
    #[serde(rename = "AI/ML")]
    AiMl,
    Data,
    #[serde(rename = "QA")]
    Qa,
    #[serde(rename = "Front-End")]
    FrontEnd,
    Security,
    DevOps,
    Mobile,
    #[serde(rename = "Site Reliability")]
    SiteReliability,
    Networking,
    #[serde(rename = "Embedded Systems")]
    EmbeddedSystems,
    Gaming,
    Financial,
    Other,
}

impl TechDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "Backend",
            Self::FullStack => "Full-Stack",
            Self::AiMl => "AI/ML",
            Self::Data => "Data",
            Self::Qa => "QA",
            Self::FrontEnd => "Front-End",
            Self::Security => "Security",
            Self::DevOps => "DevOps",
            Self::Mobile => "Mobile",
            Self::SiteReliability => "Site Reliability",
            Self::Networking => "Networking",
            Self::EmbeddedSystems => "Embedded Systems",
            Self::Gaming => "Gaming",
            Self::Financial => "Financial",
            Self::Other => "Other",
        }
    }
}

/// Builds the strict-mode JSON schema for [`JobEnrichment`]
///
/// Strict structured output requires `additionalProperties: false` on every
/// object, every property listed in `required`, and no `$ref` indirection.
pub fn enrichment_schema() -> Value {
    let schema = schema_for!(JobEnrichment);
    let mut value = serde_json::to_value(schema).unwrap_or_default();

    close_objects(&mut value);

    let definitions = value.get("definitions").cloned();
    if let Some(definitions) = definitions {
        inline_refs(&mut value, &definitions);
    }

    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
    }

    value
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                if let Some(Value::Object(props)) = map.get("properties") {
                    let required: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(required));
                }
            }

            for (_, v) in map.iter_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            // schemars wraps a documented $ref in a single-element allOf
            if matches!(map.get("allOf"), Some(Value::Array(items)) if items.len() == 1) {
                if let Some(Value::Array(mut items)) = map.remove("allOf") {
                    if let Some(Value::Object(inner)) = items.pop() {
                        for (k, v) in inner {
                            map.entry(k).or_insert(v);
                        }
                    }
                }
            }

            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(Value::Object(def)) = target {
                map.remove("$ref");
                for (k, v) in def {
                    map.entry(k).or_insert(v);
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> Value {
        serde_json::json!({
            "ParsedDescription": "Builds APIs",
            "DeadlineDate": "",
            "MinDegree": "Master's",
            "MinYearsExperience": 5,
            "Modality": "In-Office",
            "Domain": "AI/ML",
            "Languages": ["Python"],
            "Technologies": ["PyTorch"],
            "IsSoftwareEngineerRelated": true
        })
    }

    #[test]
    fn test_deserialize_wire_names() {
        let parsed: JobEnrichment = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(parsed.min_degree, Degree::Masters);
        assert_eq!(parsed.modality, Modality::InOffice);
        assert_eq!(parsed.domain, TechDomain::AiMl);
        assert_eq!(parsed.min_years_experience, 5);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_enum_value() {
        let mut json = sample_json();
        json["Modality"] = Value::String("Sometimes".to_string());
        assert!(serde_json::from_value::<JobEnrichment>(json).is_err());
    }

    #[test]
    fn test_rejects_extra_and_missing_fields() {
        let mut extra = sample_json();
        extra["Salary"] = Value::String("lots".to_string());
        assert!(serde_json::from_value::<JobEnrichment>(extra).is_err());

        let mut missing = sample_json();
        missing.as_object_mut().unwrap().remove("Domain");
        assert!(serde_json::from_value::<JobEnrichment>(missing).is_err());
    }

    #[test]
    fn test_validate_years_range() {
        let mut json = sample_json();
        json["MinYearsExperience"] = Value::from(30);
        let parsed: JobEnrichment = serde_json::from_value(json).unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_enum_strings_match_serde() {
        for degree in [Degree::Bachelors, Degree::Masters, Degree::PhD, Degree::Unspecified] {
            assert_eq!(serde_json::to_value(degree).unwrap(), degree.as_str());
        }
        for domain in [TechDomain::SiteReliability, TechDomain::EmbeddedSystems, TechDomain::Qa] {
            assert_eq!(serde_json::to_value(domain).unwrap(), domain.as_str());
        }
        assert_eq!(serde_json::to_value(Modality::InOffice).unwrap(), "In-Office");
    }

    #[test]
    fn test_schema_is_strict_and_inlined() {
        let schema = enrichment_schema();
        let root = schema.as_object().unwrap();

        assert!(!root.contains_key("definitions"));
        assert!(!root.contains_key("$schema"));
        assert_eq!(root.get("additionalProperties"), Some(&Value::Bool(false)));

        let properties = root.get("properties").unwrap().as_object().unwrap();
        assert_eq!(properties.len(), 9);

        let required: Vec<&str> = root
            .get("required")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        for key in properties.keys() {
            assert!(required.contains(&key.as_str()), "{} should be required", key);
        }

        let rendered = serde_json::to_string(&schema).unwrap();
        assert!(!rendered.contains("$ref"));
        assert!(rendered.contains("Site Reliability"));
        assert!(rendered.contains("Ph.D"));
    }
}
