pub mod colormap;
pub mod density;
pub mod events;
pub mod http_client;
pub mod pitch;
pub mod provider;
pub mod state;
pub mod statsbomb;
