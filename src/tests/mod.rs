use fixture::Fixture;

mod fixture;
