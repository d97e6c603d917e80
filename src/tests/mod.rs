mod app;
mod web;
