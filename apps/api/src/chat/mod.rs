// Chat assistant: rule-based intent classification, slot extraction and
// per-intent lookups. Collaborators are reached only through the traits in
// `collaborators`; concrete Postgres implementations live in `services`.

pub mod collaborators;
pub mod envelope;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod intent;
pub mod intents;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
