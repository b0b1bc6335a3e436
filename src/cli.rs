// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::api::types::{AnalysisRequest, OptimizeRequest, ScoreResult};
use crate::api::ApiClient;
use crate::auth;
use crate::config::Settings;
use crate::export::geometry::PageGeometry;
use crate::export::{layout, pdf};
use crate::session::SessionStore;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Client for the Nexus resume scoring service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List uploaded resumes
    List,
    /// Upload a resume PDF
    Upload { file: PathBuf },
    /// Download a previously uploaded resume
    Download {
        file_name: String,
        /// Destination path (defaults to the stored file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score a resume against a job description
    Score {
        /// Resume id from `nexus list`
        #[arg(long)]
        resume: Uuid,
        /// Job description file, or '-' to read stdin
        #[arg(long)]
        job: PathBuf,
        /// Also save the raw score result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate an optimized resume for a job description
    Optimize {
        #[arg(long)]
        resume: Uuid,
        #[arg(long)]
        job: PathBuf,
        /// Score result JSON saved by `score -o`; fills the gap lists
        #[arg(long)]
        from_score: Option<PathBuf>,
        #[arg(short, long, default_value = "optimized_resume.md")]
        output: PathBuf,
    },
    /// Export a Markdown resume to a paginated PDF
    Export {
        file: PathBuf,
        /// Destination path (defaults to the input with a .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Title drawn above the document content
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the persisted session identifier
    Session,
}

pub async fn handle_command(cli: Cli, settings: Settings) -> Result<()> {
    match cli.command {
        Command::List => {
            let client = build_client(&settings)?;
            let resumes = client.list_resumes().await?;
            if resumes.is_empty() {
                println!("No resumes uploaded yet.");
                return Ok(());
            }
            println!("{:<38} {:<32} {:<17}", "ID", "File", "Uploaded");
            println!("{}", "-".repeat(87));
            for resume in resumes {
                println!(
                    "{:<38} {:<32} {:<17}",
                    resume.id,
                    resume.file_name,
                    resume.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }

        Command::Upload { file } => {
            let file_name = resume_file_name(&file)?;
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let client = build_client(&settings)?;
            let resume = client.upload_resume(&file_name, content).await?;
            println!("✓ Uploaded {} (id: {})", resume.file_name, resume.id);
            if resume.raw_text.is_none() {
                println!("  Note: the backend could not extract text from this file.");
            }
        }

        Command::Download { file_name, output } => {
            let client = build_client(&settings)?;
            let bytes = match client.download_resume(&file_name).await {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    anyhow::bail!("No stored resume named '{}' was found", file_name)
                }
                Err(e) => return Err(e.into()),
            };

            let target = output.unwrap_or_else(|| PathBuf::from(&file_name));
            tokio::fs::write(&target, bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("✓ Saved {}", target.display());
        }

        Command::Score {
            resume,
            job,
            output,
        } => {
            let job_description = read_job_description(&job).await?;
            let client = build_client(&settings)?;

            let request = AnalysisRequest {
                resume_id: resume,
                resume_text: find_resume_text(&client, resume).await,
                job_description,
            };
            let result = client.score(&request).await?;

            print_score(&result);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize score result")?;
                tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("\n✓ Score result saved to {}", path.display());
            }
        }

        Command::Optimize {
            resume,
            job,
            from_score,
            output,
        } => {
            let job_description = read_job_description(&job).await?;
            let saved = match from_score {
                Some(path) => Some(read_score_result(&path).await?),
                None => None,
            };

            let client = build_client(&settings)?;
            let request = OptimizeRequest {
                resume_id: resume,
                resume_text: find_resume_text(&client, resume).await,
                job_description,
                missing_critical_skills: saved
                    .as_ref()
                    .map(|s| s.missing_critical_skills.clone())
                    .unwrap_or_default(),
                missing_bonus_skills: saved
                    .as_ref()
                    .map(|s| s.missing_bonus_skills.clone())
                    .unwrap_or_default(),
                suggestions: saved.map(|s| s.suggestions).unwrap_or_default(),
            };

            let result = client.optimize(&request).await?;
            tokio::fs::write(&output, &result.optimized_resume_text)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✓ Optimized resume written to {}", output.display());
            println!("  Export it with: nexus export {}", output.display());
        }

        Command::Export {
            file,
            output,
            title,
        } => {
            let markdown = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let source = match title {
                Some(title) => format!("# {}\n\n{}", title, markdown),
                None => markdown,
            };

            let doc = layout::layout(&source, PageGeometry::A4);
            let target = output.unwrap_or_else(|| file.with_extension("pdf"));
            pdf::write_file(&doc, &target).await?;
            println!("✓ Exported {} page(s) to {}", doc.pages.len(), target.display());
        }

        Command::Session => {
            let store = SessionStore::new(&settings.data_dir);
            println!("{}", store.get_or_create()?);
        }
    }

    Ok(())
}

fn build_client(settings: &Settings) -> Result<ApiClient> {
    let store = SessionStore::new(&settings.data_dir);
    let credentials = auth::resolve_credentials(&store)?;
    Ok(ApiClient::new(
        settings.base_url.clone(),
        settings.timeout_seconds,
        credentials,
    )?)
}

/// The backend only accepts PDFs; reject anything else before the request.
fn resume_file_name(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;

    match name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) if ext == "pdf" => Ok(name.to_string()),
        _ => anyhow::bail!("Only PDF resumes are supported: {}", name),
    }
}

async fn read_job_description(path: &Path) -> Result<String> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    clean_job_description(&raw)
}

fn clean_job_description(raw: &str) -> Result<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        anyhow::bail!("Job description is empty");
    }
    Ok(cleaned.to_string())
}

async fn read_score_result(path: &Path) -> Result<ScoreResult> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Not a saved score result: {}", path.display()))
}

/// Raw text travels with the request when the backend extracted any; a failed
/// lookup only means the backend falls back to its stored copy.
async fn find_resume_text(client: &ApiClient, resume_id: Uuid) -> Option<String> {
    match client.list_resumes().await {
        Ok(resumes) => resumes
            .into_iter()
            .find(|r| r.id == resume_id)
            .and_then(|r| r.raw_text),
        Err(e) => {
            debug!("Could not fetch resume list for raw text: {}", e);
            None
        }
    }
}

fn print_score(result: &ScoreResult) {
    println!("Final score: {}/100", result.final_score);
    println!();
    println!("  {:<10} {:>6.1}", "Keyword", result.breakdown.keyword_score);
    println!(
        "  {:<10} {:>6.1}",
        "Semantic", result.breakdown.semantic_score
    );
    println!(
        "  {:<10} {:>6.1}",
        "Seniority", result.breakdown.seniority_score
    );
    println!("  {:<10} {:>6.1}", "Penalties", result.breakdown.penalties);

    if let (Some(detected), Some(required)) = (result.detected_yoe, result.required_yoe) {
        println!(
            "  Experience: {:.1} years detected, {:.1} required",
            detected, required
        );
    }

    if !result.missing_critical_skills.is_empty() {
        println!("\nMissing critical skills:");
        for skill in &result.missing_critical_skills {
            println!("  - {}", skill);
        }
    }
    if !result.missing_bonus_skills.is_empty() {
        println!("\nMissing bonus skills:");
        for skill in &result.missing_bonus_skills {
            println!("  - {}", skill);
        }
    }

    println!("\n{}", result.explanation);

    if !result.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &result.suggestions {
            println!("  - {}", suggestion);
        }
    }
}
