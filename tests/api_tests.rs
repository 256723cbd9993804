mod helpers;
mod integration;
