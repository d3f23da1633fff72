pub mod help_bar;
pub mod message_bar;
pub mod text_field;
