mod slicer_tests;
