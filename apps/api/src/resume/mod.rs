// Résumé intake: PDF upload → plain text for the interview prompt.

pub mod handlers;
pub mod pdf;
