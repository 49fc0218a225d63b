//! Canned answers used when the model cannot answer.

use super::state::TutorResponse;

/// Keyword table, checked in order against the lowercased question.
const CANNED_ANSWERS: &[(&str, &str)] = &[
    (
        "string",
        "<strong>Stringing?</strong> Try these fixes:<ul>\
         <li>Lower your temperature by 5-10°C</li>\
         <li>Increase retraction distance (try 6mm for Bowden, 2mm for direct drive)</li>\
         <li>Enable \"Combing\" or \"Avoid crossing perimeters\" in your slicer</li>\
         </ul>",
    ),
    (
        "warp",
        "<strong>Warping?</strong> Here's what helps:<ul>\
         <li>Make sure your bed is level and clean</li>\
         <li>Use a brim or raft for better adhesion</li>\
         <li>Try a heated bed (60°C for PLA, 70°C for PETG)</li>\
         <li>Reduce cooling fan for the first few layers</li>\
         </ul>",
    ),
    (
        "adhesion",
        "<strong>First layer not sticking?</strong> Try:<ul>\
         <li>Level your bed (paper test: slight drag)</li>\
         <li>Clean the bed with isopropyl alcohol</li>\
         <li>Slow down first layer (try 20mm/s)</li>\
         <li>Use glue stick or hairspray if needed</li>\
         </ul>",
    ),
    (
        "clog",
        "<strong>Clogged nozzle?</strong> Here's how to fix it:<ul>\
         <li>Heat up the nozzle to printing temp</li>\
         <li>Try a cold pull: heat to 200°C, cool to 90°C, pull filament out</li>\
         <li>Use a needle to clear the nozzle (be careful, it's hot!)</li>\
         <li>As last resort: replace the nozzle</li>\
         </ul>",
    ),
    (
        "pla",
        "<strong>PLA</strong> is perfect for beginners!<ul>\
         <li>Print temp: 190-220°C</li>\
         <li>Bed temp: 50-60°C (or no heat)</li>\
         <li>Easy to print, biodegradable</li>\
         <li>Great for toys, decorations, prototypes</li>\
         </ul>",
    ),
    (
        "petg",
        "<strong>PETG</strong> is stronger than PLA:<ul>\
         <li>Print temp: 220-250°C</li>\
         <li>Bed temp: 70-80°C</li>\
         <li>Food-safe (after sealing)</li>\
         <li>More flexible, heat resistant</li>\
         </ul>",
    ),
    (
        "level",
        "<strong>Bed leveling</strong> is super important!<ul>\
         <li>Use the paper test: adjust until paper has slight drag</li>\
         <li>Check all four corners</li>\
         <li>Re-level when you move the printer</li>\
         <li>Many printers have auto-level - use it!</li>\
         </ul>",
    ),
    (
        "sell",
        "<strong>Want to sell prints?</strong> Great idea!<ul>\
         <li>Start with friends and family</li>\
         <li>Make sure to involve a parent for money stuff</li>\
         <li>Price = filament cost + time + a little profit</li>\
         <li>Take good photos in natural light</li>\
         </ul>",
    ),
    (
        "price",
        "<strong>Pricing your prints:</strong><ul>\
         <li>Filament: about $0.05 per gram (check your slicer for weight)</li>\
         <li>Add your time: maybe $5-10 per hour of design</li>\
         <li>Add a profit margin: 20-50% extra</li>\
         <li>Check what others charge for similar items!</li>\
         </ul>",
    ),
];

/// Returns the canned answer for the first keyword found in `question`.
#[must_use]
pub fn canned_answer(question: &str) -> Option<&'static str> {
    let lower = question.to_lowercase();
    CANNED_ANSWERS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, html)| *html)
}

/// The apology shown when nothing else applies.
#[must_use]
pub fn apology(error: &str) -> String {
    format!(
        "<p>Buzz... I hit a snag! ({error})</p>\
         <p>Try refreshing the page, or ask your question a different way.</p>\
         <p><strong>Quick tips while I warm up:</strong></p>\
         <ul>\
         <li>For stringing: lower temperature, increase retraction</li>\
         <li>For adhesion: level bed, clean with alcohol</li>\
         <li>For warping: use a brim, heated bed</li>\
         </ul>"
    )
}

/// Best answer available without a model.
#[must_use]
pub fn fallback_response(question: &str, error: &str) -> TutorResponse {
    canned_answer(question).map_or_else(
        || TutorResponse::error(apology(error)),
        TutorResponse::answer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        let html = canned_answer("Why is my print STRINGING?").unwrap();
        assert!(html.starts_with("<strong>Stringing?</strong>"));
    }

    #[test]
    fn test_first_keyword_wins() {
        // "string" precedes "pla" in the table
        let html = canned_answer("pla stringing").unwrap();
        assert!(html.contains("Stringing?"));
    }

    #[test]
    fn test_substring_match() {
        assert!(canned_answer("my plate is dirty").unwrap().contains("<strong>PLA</strong>"));
        assert!(canned_answer("what should I price it at").unwrap().contains("Pricing"));
    }

    #[test]
    fn test_no_match_gives_apology() {
        let response = fallback_response("What is the meaning of life?", "engine down");
        assert!(response.is_error);
        assert!(response.html.contains("Buzz... I hit a snag! (engine down)"));
        assert!(response.html.contains("For warping: use a brim, heated bed"));
    }

    #[test]
    fn test_clog_answer_text() {
        assert_eq!(
            canned_answer("my nozzle is clogged").unwrap(),
            "<strong>Clogged nozzle?</strong> Here's how to fix it:<ul>\
             <li>Heat up the nozzle to printing temp</li>\
             <li>Try a cold pull: heat to 200°C, cool to 90°C, pull filament out</li>\
             <li>Use a needle to clear the nozzle (be careful, it's hot!)</li>\
             <li>As last resort: replace the nozzle</li></ul>"
        );
    }

    #[test]
    fn test_level_answer_has_four_tips() {
        let html = canned_answer("how do I level the bed").unwrap();
        assert_eq!(html.matches("<li>").count(), 4);
        assert!(html.contains("<li>Many printers have auto-level - use it!</li>"));
    }

    #[test]
    fn test_match_is_not_an_error() {
        let response = fallback_response("my bed needs leveling", "engine down");
        assert!(!response.is_error);
        assert!(response.html.contains("Bed leveling"));
    }
}
