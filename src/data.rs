use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::error::{AtlasError, Result};

/// Product the report was requested for: name and customs tariff code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub name: String,
    #[serde(default)]
    pub inn: Option<String>,
}

/// Body of the report-generation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub product: ProductInfo,
    pub organization: OrganizationInfo,
}

/// Current tariff and the WTO-bound rate, both as fractions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TariffInfo {
    pub current: f64,
    pub wto_obligation: f64,
}

impl TariffInfo {
    pub fn delta(&self) -> f64 {
        self.current - self.wto_obligation
    }

    pub fn is_above_wto(&self) -> bool {
        self.delta() >= 0.0
    }

    pub fn wto_label(&self) -> &'static str {
        if self.is_above_wto() { "Выше уровня ВТО" } else { "Ниже уровня ВТО" }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub year: i32,
    pub value: f64,
    pub change_percent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub import_data: Vec<MetricPoint>,
    #[serde(default)]
    pub production: Vec<MetricPoint>,
    #[serde(default)]
    pub consumption: Vec<MetricPoint>,
}

/// Share of one country in the product's imports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeographyRecord {
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub share_percent: f64,
}

/// Average contract price per supplying country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractPriceRecord {
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub price_usd: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactMeasure {
    pub measure: String,
    pub before: f64,
    pub after: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub description: String,
    #[serde(default)]
    pub case_url: Option<String>,
    #[serde(default)]
    pub impact: Vec<ImpactMeasure>,
}

/// A recommended support measure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub similar_cases: Vec<CaseStudy>,
}

/// Full report as returned by the analytics service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub product: ProductInfo,
    pub organization: OrganizationInfo,
    pub tariffs: TariffInfo,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub geography: Vec<GeographyRecord>,
    #[serde(default)]
    pub prices: Vec<ContractPriceRecord>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub share_url: Option<String>,
}

/// The API wraps the report as `{"dashboard": …}`; saved reports may not.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { dashboard: DashboardReport },
    Bare(DashboardReport),
}

impl DashboardReport {
    pub fn from_json(txt: &str) -> Result<Self> {
        let report = match serde_json::from_str::<Envelope>(txt) {
            Ok(Envelope::Wrapped { dashboard }) | Ok(Envelope::Bare(dashboard)) => dashboard,
            // untagged errors say nothing useful; parse again for a real message
            Err(_) => serde_json::from_str::<DashboardReport>(txt)?,
        };
        Ok(report)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|e| AtlasError::io(path, e))?;
        let report = Self::from_json(&txt)?;
        info!(
            path = %path.display(),
            product = %report.product.name,
            countries = report.geography.len(),
            prices = report.prices.len(),
            "report loaded"
        );
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn report() -> DashboardReport {
        DashboardReport::from_json(REPORT_JSON).expect("fixture parses")
    }

    pub const REPORT_JSON: &str = r#"{
      "dashboard": {
        "product": {"name": "Насосы центробежные", "code": "8413702100"},
        "organization": {"name": "ООО Гидромаш", "inn": null},
        "tariffs": {"current": 0.05, "wto_obligation": 0.075},
        "metrics": {
          "import_data": [{"year": 2022, "value": 1200, "change_percent": 0.1},
                          {"year": 2023, "value": 1500, "change_percent": 0.25}],
          "production": [{"year": 2023, "value": 800, "change_percent": -0.05}],
          "consumption": []
        },
        "geography": [
          {"country": "Китай", "country_code": "CN", "share_percent": 0.62},
          {"country": "Беларусь", "share_percent": 0.15},
          {"country": "Атлантида", "share_percent": 0.05}
        ],
        "prices": [{"country": "CN", "country_code": "CN", "price_usd": 1200}],
        "recommendations": [{"name": "Субсидия на НИОКР", "reasons": ["рост импорта"], "similar_cases": []}],
        "share_url": "https://example.org/d/42"
      }
    }"#;
}
