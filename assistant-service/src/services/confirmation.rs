//! Detection of purchase confirmations in assistant replies.

/// Phrases that mark a reply as confirming a purchase. Matched as
/// case-insensitive substrings of the reply text.
const CONFIRMATION_PHRASES: [&str; 12] = [
    "pedido confirmado",
    "te esperamos mañana",
    "compra confirmada",
    "te esperamos",
    "queda registrado",
    "perfecto, anotado",
    "te lo guardamos",
    "te lo reservo",
    "te esperamos pronto",
    "ya está listo tu pedido",
    "queda agendado",
    "gracias por tu compra",
];

pub fn contains_confirmation_phrase(text: &str) -> bool {
    let text = text.to_lowercase();
    CONFIRMATION_PHRASES
        .iter()
        .any(|phrase| text.contains(phrase))
}
