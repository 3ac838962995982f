mod config;
mod credential;
mod download;
mod query;
mod request_interceptors;
mod transport;
