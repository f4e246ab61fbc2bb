pub mod debounce;
pub mod highlight;
pub mod validation;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use highlight::{highlight_text, highlighted_parts, Segment};
pub use validation::{
    validate_contact, validate_email, validate_name, validate_phone, validation_message, Field,
};
