//! One-shot question for an identified guest.

use serde::Serialize;

use concierge_core::ChatOutcome;

use crate::cli::{AskArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct AskResult {
    question: String,
    answered: bool,
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    used_ai: Option<bool>,
}

pub async fn handle(args: AskArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, view) = util::open(global, false)?;
    let widget = conn.widget;

    let question = args.message.join(" ");
    let outcome = widget.send(&question).await?;
    view.flush();

    let result = match outcome {
        ChatOutcome::Answered { text, used_ai } => AskResult {
            question,
            answered: true,
            answer: text,
            used_ai,
        },
        ChatOutcome::NoAnswer => AskResult {
            question,
            answered: false,
            answer: widget.messages().no_answer.to_owned(),
            used_ai: None,
        },
        ChatOutcome::Ignored => {
            return Err(CliError::Validation {
                field: "message".into(),
                reason: "message is empty".into(),
            });
        }
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &result,
        |r| output::bot(&r.answer, color),
        |r| r.answer.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
