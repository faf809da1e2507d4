pub mod braintree_service;
