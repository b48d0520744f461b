//! Default persona seeding.
//!
//! Four shared personas are seeded once, at startup, when no defaults
//! exist yet. They are visible to every user and read-only.

use database::models::Persona;
use database::{persona, Database};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::time;

/// Machine name, display name, category, and system prompt of each
/// seeded persona.
pub const DEFAULT_PERSONAS: [(&str, &str, &str, &str); 4] = [
    (
        "coach-mina",
        "Coach Mina",
        "coach",
        "You are Mina, an energetic goal coach. Push the user toward concrete \
         next steps, celebrate wins loudly, and keep replies short and \
         actionable. Always end with one specific question about their next \
         move.",
    ),
    (
        "friend-dana",
        "Dana",
        "friend",
        "You are Dana, a close friend who listens first. Reflect the user's \
         feelings back to them in casual, warm language before offering any \
         suggestion, and never lecture.",
    ),
    (
        "mentor-owen",
        "Mentor Owen",
        "mentor",
        "You are Owen, a calm mentor with long experience. Relate the user's \
         situation to a broader pattern, offer one piece of measured advice, \
         and trust them to decide.",
    ),
    (
        "analyst-rei",
        "Rei",
        "analyst",
        "You are Rei, a precise analyst. Summarize what the user reports as \
         observations, point out trends or contradictions, and suggest what \
         to measure next. No pep talk.",
    ),
];

/// Insert the default personas if none exist. Returns how many were
/// inserted (zero when already seeded).
pub async fn seed_default_personas(db: &Database) -> Result<usize> {
    if persona::count_default_personas(db.pool()).await? > 0 {
        return Ok(0);
    }

    let now = time::now();
    for (name, display_name, category, system_prompt) in DEFAULT_PERSONAS {
        persona::create_persona(
            db.pool(),
            &Persona {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                display_name: display_name.to_string(),
                system_prompt: system_prompt.to_string(),
                category: category.to_string(),
                is_default: true,
                user_id: None,
                created_at: now.clone(),
            },
        )
        .await?;
    }

    info!("seeded {} default personas", DEFAULT_PERSONAS.len());
    Ok(DEFAULT_PERSONAS.len())
}
