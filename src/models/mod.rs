pub mod event_ref;
