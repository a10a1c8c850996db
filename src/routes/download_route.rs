use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::{
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, Either, HttpResponse,
};

use crate::configuration::Settings;

type DownloadResponse = Either<NamedFile, HttpResponse>;

#[get("/download/{kind}")]
pub async fn download(kind: web::Path<String>, settings: web::Data<Settings>) -> DownloadResponse {
    let (path, missing) = match kind.as_str() {
        "csv" => (&settings.scraper.output_csv, "No CSV output found."),
        "json" => (&settings.scraper.output_json, "No JSON output found."),
        _ => return Either::Right(HttpResponse::NotFound().finish()),
    };
    let path = PathBuf::from(path);

    match NamedFile::open_async(&path).await {
        Ok(file) => {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("output.{}", kind));

            Either::Left(file.set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            }))
        }
        Err(e) => {
            log::debug!("Download of {} unavailable: {}", path.display(), e);
            Either::Right(HttpResponse::NotFound().body(missing))
        }
    }
}
