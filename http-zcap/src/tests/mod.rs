mod capability;
mod fixtures;
