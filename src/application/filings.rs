#[cfg(test)]
#[path = "filings_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use owo_colors::OwoColorize;

use crate::domain::models::Filing;
use crate::domain::models::FilingsBackend;
use crate::domain::models::HighlightSurface;
use crate::domain::services::formatters::format_date;
use crate::domain::services::highlight_chunk;
use crate::domain::services::organize_filings;
use crate::domain::services::HIGHLIGHT_ID;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::surfaces::strip_tags;
use crate::infrastructure::surfaces::RenderedDocument;

fn format_filing(filing: &Filing) -> String {
    let date = filing
        .report_date()
        .map(format_date)
        .unwrap_or_else(|| return filing.report_date.to_string());
    return format!("      - {date} ({})", filing.accession_number);
}

/// Year, quarter and form type as an indented outline, newest year first.
pub fn render_tree(filings: &[Filing]) -> String {
    let tree = organize_filings(filings);
    let mut lines = vec![];
    for (year, quarters) in tree.iter().rev() {
        lines.push(year.to_string());
        for (quarter, forms) in quarters.iter().rev() {
            lines.push(format!("  {quarter}"));
            for (form_type, filings) in forms {
                lines.push(format!("    {form_type}"));
                lines.extend(filings.iter().map(format_filing));
            }
        }
    }

    return lines.join("\n");
}

/// Plain text excerpt around the wrapped chunk, or the whole filing as text
/// when no chunk was asked for.
pub fn render_document(html: &str, chunk: Option<&str>) -> Result<String> {
    let chunk = match chunk {
        Some(chunk) => chunk,
        None => return Ok(strip_tags(html)),
    };

    let outcome = highlight_chunk(html, chunk, true);
    if !outcome.wrapped {
        bail!("The requested passage does not appear in this filing");
    }

    let document = RenderedDocument::new(&outcome.html);
    if !document.scroll_into_view(HIGHLIGHT_ID) {
        bail!("The highlighted passage could not be rendered");
    }

    return Ok(document.excerpt().unwrap_or_default());
}

pub async fn run(matches: &ArgMatches) -> Result<bool> {
    let backend = BackendManager::get()?;

    match matches.subcommand() {
        Some(("list", list_matches)) => {
            let ticker = list_matches
                .get_one::<String>("ticker")
                .map(|ticker| return ticker.to_uppercase())
                .unwrap_or_default();
            let filings = backend.list_filings(&ticker).await?;
            if filings.is_empty() {
                println!("No filings found for {ticker}.");
            } else {
                println!("{}", ticker.bold());
                println!("{}", render_tree(&filings));
            }
        }
        Some(("show", show_matches)) => {
            let ticker = show_matches
                .get_one::<String>("ticker")
                .map(|ticker| return ticker.to_uppercase())
                .unwrap_or_default();
            let accession = show_matches
                .get_one::<String>("accession")
                .map(|accession| return accession.to_string())
                .unwrap_or_default();
            let chunk = show_matches.get_one::<String>("chunk");

            let html = backend.fetch_document(&ticker, &accession).await?;
            println!("{}", render_document(&html, chunk.map(|chunk| return chunk.as_str()))?);
        }
        _ => return Ok(false),
    }

    return Ok(true);
}
