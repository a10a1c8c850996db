use std::{future::Future, path::PathBuf, sync::Mutex};

use actix_web::{get, http::header, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    configuration::Settings,
    services::{run_scrape_job, JobError, JobReport, ScrapeRequest},
};

#[derive(Debug, Clone, Default)]
pub struct JobStatus {
    pub job_id: Option<Uuid>,
    pub running: bool,
    pub done: bool,
    pub succeeded: bool,
    pub message: String,
}

/// The single job slot shared by all dashboard workers.
#[derive(Default)]
pub struct JobState {
    slot: Mutex<JobStatus>,
}

impl JobState {
    pub fn snapshot(&self) -> JobStatus {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Claims the slot, or returns None when a job is already running.
    pub fn try_start(&self) -> Option<Uuid> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.running {
            return None;
        }

        let job_id = Uuid::new_v4();
        *slot = JobStatus {
            job_id: Some(job_id),
            running: true,
            done: false,
            succeeded: false,
            message: "Scraping in progress...".to_string(),
        };
        Some(job_id)
    }

    pub fn finish(&self, result: Result<JobReport, JobError>) {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.running = false;
        slot.done = true;

        match result {
            Ok(report) => {
                slot.succeeded = true;
                slot.message = format!(
                    "Scraping complete. {} records saved ({}).",
                    report.records, report.outcome
                );
            }
            Err(e) => {
                slot.succeeded = false;
                slot.message = format!("Error: {}", e);
            }
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    delay_min: f64,
    delay_max: f64,
}

#[derive(Template)]
#[template(path = "status.html")]
struct StatusTemplate {
    job_id: String,
    running: bool,
    done: bool,
    succeeded: bool,
    message: String,
}

fn render(template: impl Template) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            log::error!("Failed to render template: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/")]
pub async fn index(settings: web::Data<Settings>) -> HttpResponse {
    render(IndexTemplate {
        delay_min: settings.scraper.delay_min_secs,
        delay_max: settings.scraper.delay_max_secs,
    })
}

#[derive(Deserialize)]
struct StartJobForm {
    urls: String,
    dynamic: Option<String>,
    paginate: Option<String>,
    #[serde(default)]
    delay_min: String,
    #[serde(default)]
    delay_max: String,
    #[serde(default)]
    proxies_file: String,
    #[serde(default)]
    config_file: String,
}

fn optional_path(raw: &str) -> Option<PathBuf> {
    match raw.trim() {
        "" => None,
        path => Some(PathBuf::from(path)),
    }
}

impl StartJobForm {
    fn into_request(self, settings: &Settings) -> ScrapeRequest {
        let delay_min = self
            .delay_min
            .trim()
            .parse()
            .unwrap_or(settings.scraper.delay_min_secs);
        let delay_max = self
            .delay_max
            .trim()
            .parse()
            .unwrap_or(settings.scraper.delay_max_secs);

        ScrapeRequest {
            urls: self.urls.split_whitespace().map(str::to_string).collect(),
            dynamic: self.dynamic.is_some(),
            paginate: self.paginate.is_some(),
            delay: (delay_min, delay_max),
            proxies_file: optional_path(&self.proxies_file),
            config_file: optional_path(&self.config_file),
        }
    }
}

/// Runs the job on its own task so the slot is released even if the job panics.
fn spawn_job<F>(job_state: web::Data<JobState>, job_id: Uuid, job: F) -> JoinHandle<()>
where
    F: Future<Output = Result<JobReport, JobError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = match tokio::spawn(job).await {
            Ok(result) => result,
            Err(e) => Err(JobError::Aborted(e.to_string())),
        };
        if let Err(ref e) = result {
            log::error!("Job {} failed: {}", job_id, e);
        }
        job_state.finish(result);
    })
}

#[post("/")]
pub async fn start_job(
    form: web::Form<StartJobForm>,
    settings: web::Data<Settings>,
    job_state: web::Data<JobState>,
) -> HttpResponse {
    let request = form.into_inner().into_request(&settings);

    match job_state.try_start() {
        Some(job_id) => {
            log::info!("Starting job {} over {} urls", job_id, request.urls.len());
            let settings = settings.get_ref().clone();
            spawn_job(job_state.clone(), job_id, async move {
                run_scrape_job(&settings, &request).await
            });
        }
        None => log::info!("A job is already running, ignoring new request"),
    }

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/status"))
        .finish()
}

#[get("/status")]
pub async fn job_status(job_state: web::Data<JobState>) -> HttpResponse {
    let current = job_state.snapshot();
    let message = match current.message.is_empty() {
        true => "No job has been started yet.".to_string(),
        false => current.message,
    };

    render(StatusTemplate {
        job_id: current.job_id.map(|id| id.to_string()).unwrap_or_default(),
        running: current.running,
        done: current.done,
        succeeded: current.succeeded,
        message,
    })
}
