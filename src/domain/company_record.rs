use serde::{Deserialize, Serialize};

/// One company extracted from one page. Field order is the output column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_name: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
    pub address: String,
    pub description: String,
    pub year_founded: String,
    pub products: String,
    pub services: String,
    pub industry: String,
    pub tech_stack: String,
    pub projects: String,
    pub competitors: String,
    pub market_position: String,
    pub hunter_company: String,
    pub hunter_industry: String,
    pub hunter_emails: String,
    pub hunter_country: String,
    pub hunter_state: String,
    pub hunter_city: String,
    pub hunter_phone: String,
    pub hunter_linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub company: String,
    pub industry: String,
    pub emails: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub phone: String,
    pub linkedin: String,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        *self == Enrichment::default()
    }
}

impl CompanyRecord {
    pub fn new(website: &str) -> Self {
        CompanyRecord {
            website: website.to_string(),
            ..Default::default()
        }
    }

    pub fn has_identity(&self) -> bool {
        !self.company_name.is_empty() || !self.email.is_empty() || !self.phone.is_empty()
    }

    pub fn merge_enrichment(&mut self, enrichment: Enrichment) {
        self.hunter_company = enrichment.company;
        self.hunter_industry = enrichment.industry;
        self.hunter_emails = enrichment.emails;
        self.hunter_country = enrichment.country;
        self.hunter_state = enrichment.state;
        self.hunter_city = enrichment.city;
        self.hunter_phone = enrichment.phone;
        self.hunter_linkedin = enrichment.linkedin;
    }
}
