//! System prompt construction.

use super::mode::TutorMode;
use super::state::{LearnerContext, Prompt};

/// Builds the prompt for `question`. Pure; no side effects.
#[must_use]
pub fn build_prompt(
    question: &str,
    context: &LearnerContext,
    mode: TutorMode,
    topics: &[String],
) -> Prompt {
    Prompt {
        system: system_prompt(context, mode, topics),
        user: question.to_string(),
    }
}

fn system_prompt(context: &LearnerContext, mode: TutorMode, topics: &[String]) -> String {
    let completed = if context.completed_modules.is_empty() {
        "Just getting started!".to_string()
    } else {
        context.completed_modules.join(", ")
    };

    let topic_list = topics
        .iter()
        .map(|t| format!("• {t}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are LayerBEE, a friendly 3D printing tutor for young makers!

YOUR PERSONALITY:
- Enthusiastic about 3D printing and making
- Patient and encouraging
- Uses simple, clear language
- Adds occasional bee puns (but don't overdo it!)

CURRENT CONTEXT:
- User's skill level: {skill}
- Current module: {module}
- Completed: {completed}
- Their printer: {printer}
- Their slicer: {slicer}

TOPICS YOU CAN COVER:
{topic_list}

{mode_instructions}

SAFETY RULES (ALWAYS FOLLOW):
- Remind about hot surfaces (bed, nozzle) when relevant
- Mention ventilation for certain filaments
- Never suggest anything that could be dangerous
- For business questions: remind to involve parents for money/selling

RESPONSE STYLE:
- Keep answers concise but helpful
- Use bullet points for steps
- Include one emoji per response max
- If they ask something outside 3D printing, gently redirect",
        skill = context.skill_level,
        module = context.current_module,
        printer = context.printer_type,
        slicer = context.slicer,
        mode_instructions = mode.instructions(),
    )
}
