mod complaint;
mod repository;
