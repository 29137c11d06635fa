//! UI Components

pub mod login_page;
pub mod map_view;
pub mod passport_view;
pub mod qr_scanner;
pub mod toast;
pub mod venue_modal;

pub use login_page::LoginPage;
pub use map_view::MapView;
pub use passport_view::PassportView;
pub use qr_scanner::QrScanner;
pub use toast::{ToastFrame, use_toast, use_toast_provider};
pub use venue_modal::VenueModal;
