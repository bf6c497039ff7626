pub mod accuracy_txt;
pub mod html;
pub mod length_txt;
pub mod summary_txt;
