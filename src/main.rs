use enroll_toggle::{
    config::resolve_base_url, control::ControlView, ActivationEvent, CourseId, EnrollmentToggleHandler,
    HttpEnrollmentApi, Notice, NoticeBoard, Outcome, Page,
};
use serde::Serialize;
use std::{env, process::ExitCode};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Serialize)]
struct Report {
    controls: Vec<ControlView>,
    notices: Vec<Notice>,
    outcomes: Vec<ActivationReport>,
}

#[derive(Debug, Serialize)]
struct ActivationReport {
    course_id: CourseId,
    #[serde(flatten)]
    outcome: Outcome,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map_or("enroll_toggle", String::as_str);
        eprintln!("usage: {program} <page.html> [course_id...]");
        return Ok(ExitCode::from(2));
    }

    let base_url = resolve_base_url()?;
    let html = fs::read_to_string(&args[1]).await?;
    let page = Page::scan(&html);
    info!(controls = page.len(), %base_url, "page bound");

    let handler = EnrollmentToggleHandler::new(HttpEnrollmentApi::new(base_url)?, NoticeBoard::new());

    let mut outcomes = Vec::with_capacity(args.len() - 2);
    for raw in &args[2..] {
        let course_id = CourseId::new(raw.as_str())?;
        let mut event = ActivationEvent::new(course_id.clone());
        let outcome = handler.handle(&page, &mut event).await;
        outcomes.push(ActivationReport { course_id, outcome });
    }

    let report = Report {
        controls: page.views().await,
        notices: handler.notices().pending().await,
        outcomes,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(ExitCode::SUCCESS)
}
