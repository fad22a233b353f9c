pub mod cache;
pub mod geometry_provider;
pub mod lat_lng;
pub mod osrm_route_client;
pub mod route_geometry;
pub mod straight_line;
