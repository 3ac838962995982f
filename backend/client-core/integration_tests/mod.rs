// Integration tests for client-core
// Every test drives the facade against a wiremock server over real HTTP.

mod helpers;

mod download;
mod facade;
mod services;
mod session;
