use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(rename = "propertyName")]
    pub name: String,
    #[serde(rename = "unitOfMeasurement", default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coefficient {
    pub id: String,
    #[serde(rename = "coefficientName")]
    pub name: String,
    #[serde(rename = "unitOfMeasurement", default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub property: Property,
    #[serde(rename = "propertyValue")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientValue {
    pub coefficient: Coefficient,
    #[serde(rename = "coefficientValue")]
    pub value: f64,
}

/// A catalog material. Identity is the `id`; names repeat across materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(rename = "materialType", default)]
    pub material_type: String,
    #[serde(rename = "propertyValues", default)]
    pub property_values: Vec<PropertyValue>,
    #[serde(rename = "coefficientValues", default)]
    pub coefficient_values: Vec<CoefficientValue>,
}

impl Material {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            material_type: String::new(),
            property_values: Vec::new(),
            coefficient_values: Vec::new(),
        }
    }

    pub fn with_property(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        value: f64,
    ) -> Self {
        self.property_values.push(PropertyValue {
            property: Property {
                id: id.into(),
                name: name.into(),
                unit: unit.into(),
                description: None,
            },
            value,
        });
        self
    }

    pub fn with_coefficient(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        value: f64,
    ) -> Self {
        self.coefficient_values.push(CoefficientValue {
            coefficient: Coefficient {
                id: id.into(),
                name: name.into(),
                unit: unit.into(),
                description: None,
            },
            value,
        });
        self
    }
}
