use ai_act_compass::error::AppError;
use ai_act_compass::workflows::assessment::{
    QuestionCatalog, RiskAssessment, SurveyChoice, SurveyError, SurveySession,
};
use clap::Args;
use std::io::{self, BufRead, Write};

#[derive(Args, Debug, Default)]
pub(crate) struct SurveyArgs {
    /// Comma-separated answers in catalog order (yes/no/unsure or y/n/u); skips the prompts
    #[arg(long)]
    pub(crate) answers: Option<String>,
}

pub(crate) fn run_survey(args: SurveyArgs) -> Result<(), AppError> {
    let catalog = QuestionCatalog::eu_ai_act();
    let verdict = match args.answers {
        Some(raw) => scripted_verdict(&catalog, &raw)?,
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            match interactive_verdict(&catalog, stdin.lock(), stdout.lock())? {
                Some(verdict) => verdict,
                None => {
                    eprintln!("Survey abandoned; no verdict recorded.");
                    return Ok(());
                }
            }
        }
    };

    let rendered = serde_json::to_string_pretty(&verdict).map_err(io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

/// Replays one answer per question, in catalog order. Answers past the final question are ignored.
pub(crate) fn scripted_verdict(
    catalog: &QuestionCatalog,
    raw: &str,
) -> Result<RiskAssessment, SurveyError> {
    let choices = raw
        .split(',')
        .map(str::parse::<SurveyChoice>)
        .collect::<Result<Vec<_>, _>>()?;

    SurveySession::replay(
        catalog,
        catalog
            .list()
            .iter()
            .zip(choices)
            .map(|(question, choice)| (question.id, choice)),
    )
}

/// Prompts for each question until the final one is answered.
///
/// `p` steps back one question and `q` abandons the survey, returning `None`.
pub(crate) fn interactive_verdict<In, Out>(
    catalog: &QuestionCatalog,
    mut input: In,
    mut output: Out,
) -> Result<Option<RiskAssessment>, AppError>
where
    In: BufRead,
    Out: Write,
{
    let mut session = SurveySession::new(catalog);
    let mut line = String::new();

    while let Some(question) = session.current_question() {
        if session.is_complete() {
            return Ok(Some(session.finalize()?));
        }

        let index = session.current_index().unwrap_or_default();
        writeln!(
            output,
            "\n[{}/{}] {} ({:.0}% complete)",
            index + 1,
            catalog.len(),
            question.category.label(),
            session.progress_pct()
        )?;
        writeln!(output, "{}", question.text)?;
        if let Some(note) = question.note {
            writeln!(output, "  Note: {note}")?;
        }
        if let Some(previous) = session.answer_for(question.id) {
            writeln!(output, "  Previous answer: {previous}")?;
        }
        write!(output, "Answer [y]es / [n]o / [u]nsure, [p]revious, [q]uit: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" => return Ok(None),
            "p" | "previous" => {
                if let Err(err) = session.previous() {
                    writeln!(output, "  {err}")?;
                }
            }
            other => match other.parse::<SurveyChoice>() {
                Ok(choice) => {
                    session.answer(question.id, choice)?;
                }
                Err(err) => writeln!(output, "  {err}")?,
            },
        }
    }

    Err(SurveyError::Closed.into())
}
