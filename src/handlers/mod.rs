mod hello;
pub use hello::{create_last_greeted_map, handle_hello, LastGreetedMap};

mod roll;
pub use roll::handle_roll;

mod http_cat;
pub use http_cat::handle_http_cat;

mod ufc_card;
pub use ufc_card::handle_ufc_card;
