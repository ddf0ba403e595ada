use chrono::NaiveDate;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    #[serde(alias = "formType")]
    pub form_type: String,
    #[serde(alias = "reportDate")]
    pub report_date: String,
    #[serde(alias = "accessionNumber")]
    pub accession_number: String,
}

impl Filing {
    pub fn new(form_type: &str, report_date: &str, accession_number: &str) -> Filing {
        return Filing {
            form_type: form_type.to_string(),
            report_date: report_date.to_string(),
            accession_number: accession_number.to_string(),
        };
    }

    pub fn report_date(&self) -> Option<NaiveDate> {
        return NaiveDate::parse_from_str(self.report_date.trim(), "%Y-%m-%d").ok();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn from_month(month: u32) -> Option<Quarter> {
        match month {
            1..=3 => return Some(Quarter::Q1),
            4..=6 => return Some(Quarter::Q2),
            7..=9 => return Some(Quarter::Q3),
            10..=12 => return Some(Quarter::Q4),
            _ => return None,
        }
    }
}
