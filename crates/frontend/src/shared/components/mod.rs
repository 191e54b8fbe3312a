pub mod pagination_controls;
