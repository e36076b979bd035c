use serde::{Deserialize, Serialize};

/// The calculators offered, one per tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    Compensation,
    Vat,
    Customs,
    Freelancer,
}

/// Descriptive metadata for a [`TaxType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxTypeInfo {
    pub id: TaxType,
    pub name: &'static str,
    pub description: &'static str,
    pub rate: &'static str,
    pub applicable_to: &'static str,
}

impl TaxType {
    pub fn all() -> &'static [TaxType] {
        &[
            TaxType::Compensation,
            TaxType::Vat,
            TaxType::Customs,
            TaxType::Freelancer,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compensation => "compensation",
            Self::Vat => "vat",
            Self::Customs => "customs",
            Self::Freelancer => "freelancer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compensation" => Some(Self::Compensation),
            "vat" => Some(Self::Vat),
            "customs" => Some(Self::Customs),
            "freelancer" => Some(Self::Freelancer),
            _ => None,
        }
    }

    pub fn info(&self) -> TaxTypeInfo {
        match self {
            Self::Compensation => TaxTypeInfo {
                id: *self,
                name: "Compensation Income Tax",
                description: "Tax on salaries, wages, and other compensation from employment",
                rate: "0% - 35%",
                applicable_to: "Employees and workers",
            },
            Self::Vat => TaxTypeInfo {
                id: *self,
                name: "Value Added Tax (VAT)",
                description: "Tax on sale of goods and services",
                rate: "12%",
                applicable_to: "VAT-registered businesses",
            },
            Self::Customs => TaxTypeInfo {
                id: *self,
                name: "Customs Duty & Import Tax",
                description: "Duties, taxes and fees on imported goods via express couriers",
                rate: "Variable",
                applicable_to: "Importers and express shipments",
            },
            Self::Freelancer => TaxTypeInfo {
                id: *self,
                name: "Freelancer Tax Calculator",
                description: "Income tax options, percentage tax, VAT, and filing period",
                rate: "8% - 35%",
                applicable_to: "Freelancers and self-employed",
            },
        }
    }
}
