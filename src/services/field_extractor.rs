use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::{CompanyRecord, DataExtractionError, FieldRules};

const SNIPPET_LEN: usize = 200;

const SOCIAL_PLATFORMS: [(&str, &str); 4] = [
    ("linkedin", "linkedin.com"),
    ("twitter", "twitter.com"),
    ("facebook", "facebook.com"),
    ("instagram", "instagram.com"),
];

const TECH_KEYWORDS: [&str; 35] = [
    "react",
    "angular",
    "vue",
    "django",
    "flask",
    "spring",
    "node",
    "express",
    "ruby on rails",
    "laravel",
    "wordpress",
    "drupal",
    "magento",
    "shopify",
    "firebase",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "graphql",
    "typescript",
    "javascript",
    "python",
    "java",
    "php",
    "c#",
    "c++",
    "go",
    "swift",
    "kotlin",
];

fn selector(raw: &str) -> Selector {
    Selector::parse(raw).unwrap()
}

fn regex(raw: &str) -> Regex {
    Regex::new(raw).unwrap()
}

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static OG_SITE_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:site_name"]"#));
static MAILTO: Lazy<Selector> = Lazy::new(|| selector(r#"a[href^="mailto"]"#));
static TEL: Lazy<Selector> = Lazy::new(|| selector(r#"a[href^="tel"]"#));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static ADDRESS: Lazy<Selector> = Lazy::new(|| selector("address"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static SECTION_DIV_P: Lazy<Selector> = Lazy::new(|| selector("section, div, p"));
static P_SPAN_DIV: Lazy<Selector> = Lazy::new(|| selector("p, span, div"));
static SECTION_DIV_LIST: Lazy<Selector> = Lazy::new(|| selector("section, div, ul, ol"));
static SCRIPT_LINK: Lazy<Selector> = Lazy::new(|| selector("script, link"));

static EMAIL: Lazy<Regex> = Lazy::new(|| regex(r"[\w.-]+@[\w.-]+"));
static PHONE: Lazy<Regex> = Lazy::new(|| regex(r"\+?\d[\d\s\-()]{7,}\d"));
static STREET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| regex(r"\d{1,5} [\w .,-]+,? [A-Za-z ]+,? [A-Z]{2,} \d{5}"));
static FOUNDED: Lazy<Regex> = Lazy::new(|| regex(r"(?i)Founded in (\d{4})"));
static PRODUCTS: Lazy<Regex> = Lazy::new(|| regex(r"(?i)products?|solutions?"));
static SERVICES: Lazy<Regex> = Lazy::new(|| regex(r"(?i)services?|offerings?"));
static INDUSTRY: Lazy<Regex> = Lazy::new(|| regex(r"(?i)industry|sector|market"));
static PROJECTS: Lazy<Regex> = Lazy::new(|| regex(r"(?i)project|initiative|focus|case study"));
static COMPETITORS: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)competitor|alternative|vs\.?|compared to"));
static MARKET_POSITION: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)leader|challenger|innovator|market position"));

/// Turns one page into a [`CompanyRecord`].
///
/// Every field is filled by a chain of strategies tried in order, the first
/// non-empty result wins. Configured selectors and regexes from [`FieldRules`]
/// take the first slot of the name, email and phone chains (regex overrides
/// replace the built-in pattern instead).
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    rules: FieldRules,
}

impl FieldExtractor {
    pub fn new(rules: FieldRules) -> Self {
        FieldExtractor { rules }
    }

    pub fn extract(&self, html: &str, url: &str) -> Result<CompanyRecord, DataExtractionError> {
        let document = Html::parse_document(html);
        let mut record = CompanyRecord::new(url);

        record.company_name = selected_value(&document, self.rules.company_name_selector.as_ref())
            .or_else(|| first_text(&document, &TITLE))
            .or_else(|| meta_content(&document, &OG_SITE_NAME))
            .unwrap_or_default();

        record.email = selected_value(&document, self.rules.email_selector.as_ref())
            .or_else(|| scheme_link(&document, &MAILTO, "mailto:"))
            .or_else(|| first_match(html, self.rules.email_regex.as_ref().unwrap_or(&EMAIL)))
            .unwrap_or_default();

        record.phone = selected_value(&document, self.rules.phone_selector.as_ref())
            .or_else(|| scheme_link(&document, &TEL, "tel:"))
            .or_else(|| first_match(html, self.rules.phone_regex.as_ref().unwrap_or(&PHONE)))
            .unwrap_or_default();

        if !record.has_identity() {
            log::debug!("No name, email or phone on {}", url);
            return Err(DataExtractionError(url.to_string()));
        }

        for (platform, domain) in SOCIAL_PLATFORMS {
            let link = social_link(&document, domain);
            match platform {
                "linkedin" => record.linkedin = link,
                "twitter" => record.twitter = link,
                "facebook" => record.facebook = link,
                _ => record.instagram = link,
            }
        }

        record.address = first_text(&document, &ADDRESS)
            .or_else(|| first_match(html, &STREET_ADDRESS))
            .unwrap_or_default();

        record.description = meta_content(&document, &META_DESCRIPTION)
            .or_else(|| meta_content(&document, &OG_DESCRIPTION))
            .unwrap_or_default();

        record.year_founded = FOUNDED
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|year| year.as_str().to_string())
            .unwrap_or_default();

        let (products, services) = products_and_services(&document);
        record.products = products;
        record.services = services;

        record.industry = first_snippet(&document, &P_SPAN_DIV, &INDUSTRY);
        record.projects = first_snippet(&document, &SECTION_DIV_P, &PROJECTS);
        record.competitors = first_snippet(&document, &SECTION_DIV_LIST, &COMPETITORS);
        record.market_position = first_snippet(&document, &P_SPAN_DIV, &MARKET_POSITION);

        record.tech_stack = tech_stack(&document, html);

        Ok(record)
    }
}

fn non_empty(value: String) -> Option<String> {
    match value.is_empty() {
        true => None,
        false => Some(value),
    }
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LEN).collect()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .and_then(non_empty)
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .and_then(non_empty)
}

fn strip_scheme(href: &str, scheme: &str) -> String {
    let without_scheme = href.replace(scheme, "");
    without_scheme
        .split('?')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn scheme_link(document: &Html, selector: &Selector, scheme: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| strip_scheme(href, scheme))
        .and_then(non_empty)
}

/// First element matched by a configured selector: its text, else its
/// `content` attribute, else its href without a mailto/tel scheme.
fn selected_value(document: &Html, selector: Option<&Selector>) -> Option<String> {
    let element = document.select(selector?).next()?;

    non_empty(element_text(element))
        .or_else(|| {
            element
                .value()
                .attr("content")
                .map(|c| c.trim().to_string())
                .and_then(non_empty)
        })
        .or_else(|| {
            element
                .value()
                .attr("href")
                .map(|href| strip_scheme(&strip_scheme(href, "mailto:"), "tel:"))
                .and_then(non_empty)
        })
}

fn first_match(html: &str, pattern: &Regex) -> Option<String> {
    pattern
        .find(html)
        .map(|m| m.as_str().to_string())
        .and_then(non_empty)
}

fn social_link(document: &Html, domain: &str) -> String {
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(domain))
        .map(str::to_string)
        .unwrap_or_default()
}

fn products_and_services(document: &Html) -> (String, String) {
    let mut products = String::new();
    let mut services = String::new();

    for block in document.select(&SECTION_DIV_P) {
        let text = element_text(block);
        if products.is_empty() && PRODUCTS.is_match(&text) {
            products = snippet(&text);
        }
        if services.is_empty() && SERVICES.is_match(&text) {
            services = snippet(&text);
        }
        if !products.is_empty() && !services.is_empty() {
            break;
        }
    }

    (products, services)
}

fn first_snippet(document: &Html, blocks: &Selector, keywords: &Regex) -> String {
    document
        .select(blocks)
        .map(element_text)
        .find(|text| keywords.is_match(text))
        .map(|text| snippet(&text))
        .unwrap_or_default()
}

fn tech_stack(document: &Html, html: &str) -> String {
    let lower_html = html.to_lowercase();
    let asset_urls: Vec<String> = document
        .select(&SCRIPT_LINK)
        .filter_map(|tag| tag.value().attr("src").or_else(|| tag.value().attr("href")))
        .map(str::to_lowercase)
        .collect();

    TECH_KEYWORDS
        .iter()
        .filter(|tech| {
            lower_html.contains(*tech) || asset_urls.iter().any(|src| src.contains(*tech))
        })
        .sorted()
        .dedup()
        .join(", ")
}
