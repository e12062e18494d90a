pub mod ids_to_details;
pub mod lookup_tag;
pub mod mutate;
pub mod paginate;
pub mod tag_to_details;
pub mod tag_to_ids;
