/// UI widgets for DriveDoc.

pub mod status_bar;
