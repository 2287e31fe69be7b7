mod dialogs;
mod error_message;
mod file_chooser;
mod filter_page;
mod home;
mod icons;
mod image_filter;
